//! LeafScan Server
//!
//! HTTP API server for plant leaf disease classification. Accepts an uploaded
//! image on `POST /check_image` and returns the predicted class with its
//! confidence.

mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use leafscan::utils::logging::{init_logging, LogConfig};
use leafscan::{InferenceConfig, Pipeline, ProfileSource, MODEL_PATH_ENV};
use tracing::{error, info, warn, Level};

use crate::state::{AppState, ServerConfig};

/// Built-in class tables
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Profile {
    /// 38 PlantVillage classes with training counts
    Plantvillage,
    /// 38 short class names, no training counts
    Condensed,
}

impl Profile {
    fn name(self) -> &'static str {
        match self {
            Profile::Plantvillage => "plantvillage",
            Profile::Condensed => "condensed",
        }
    }
}

/// Log verbosity accepted by `--log-level`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// LeafScan Server
#[derive(Parser, Debug)]
#[command(name = "leafscan-server")]
#[command(version)]
#[command(about = "HTTP API server for plant leaf disease classification")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// JSON inference configuration; the flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the resolved inference configuration to this file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Path to the ONNX model [default: model.onnx]
    #[arg(short, long, env = MODEL_PATH_ENV)]
    model: Option<PathBuf>,

    /// Built-in class profile matching the model [default: plantvillage]
    #[arg(long, value_enum)]
    profile: Option<Profile>,

    /// JSON class profile (overrides --profile)
    #[arg(long)]
    class_config: Option<PathBuf>,

    /// Side length of the model input [default: 224]
    #[arg(long)]
    image_size: Option<u32>,

    /// Run model calls one at a time
    #[arg(long, default_value = "false")]
    serialize_inference: bool,

    /// Directory served under /static
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Maximum upload size in megabytes
    #[arg(long, default_value = "25")]
    max_upload_mb: usize,

    /// Enable verbose logging (per-class scores)
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Log level (overrides --verbose)
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

impl Cli {
    fn log_config(&self) -> LogConfig {
        let config = if self.verbose {
            LogConfig::verbose()
        } else {
            LogConfig::default()
        };

        match self.log_level {
            Some(level) => config.with_level(level.into()),
            None => config,
        }
    }

    fn server_config(&self) -> anyhow::Result<ServerConfig> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;

        let mut inference = match &self.config {
            Some(path) => InferenceConfig::load(path)?,
            None => InferenceConfig::default(),
        };

        if let Some(model) = &self.model {
            inference = inference.with_model_path(model.clone());
        }
        if let Some(path) = &self.class_config {
            inference = inference.with_profile(ProfileSource::File(path.clone()));
        } else if let Some(profile) = self.profile {
            inference = inference.with_profile(ProfileSource::Builtin(profile.name().to_string()));
        }
        if let Some(size) = self.image_size {
            inference = inference.with_image_size(size);
        }
        if self.serialize_inference {
            inference = inference.with_serialized_inference(true);
        }

        Ok(ServerConfig {
            addr,
            inference,
            static_dir: self.static_dir.clone(),
            max_upload_bytes: self.max_upload_mb * 1024 * 1024,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_config())?;

    // Build configuration
    let config = cli.server_config()?;

    if let Some(path) = &cli.save_config {
        config.inference.save(path)?;
        info!("Wrote inference configuration to {:?}", path);
        return Ok(());
    }

    info!("LeafScan Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Model:      {:?}", config.inference.model_path);
    info!("  Profile:    {:?}", config.inference.profile);
    info!("  Image size: {}", config.inference.image_size);
    info!("  Static dir: {:?}", config.static_dir);

    if let Some(dir) = &config.static_dir {
        if !dir.is_dir() {
            warn!("Static directory {:?} does not exist; /static will return 404", dir);
        }
    }

    // Load model and class tables; nothing is served if this fails
    let pipeline = match Pipeline::from_config(&config.inference) {
        Ok(pipeline) => {
            info!("Model loaded successfully.");
            pipeline
        }
        Err(e) => {
            error!("Failed to load model: {:?}", e);
            return Err(e.into());
        }
    };

    // Create shared state
    let addr = config.addr;
    let state = Arc::new(AppState::new(config, pipeline));

    // Build router
    let app = routes::router(state);

    // Start server
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["leafscan-server", "--model", "leaf.onnx"]).unwrap();
        let config = cli.server_config().unwrap();

        assert_eq!(config.addr.port(), 8000);
        assert_eq!(config.inference.model_path, PathBuf::from("leaf.onnx"));
        assert_eq!(
            config.inference.profile,
            ProfileSource::Builtin("plantvillage".to_string())
        );
        assert_eq!(config.inference.image_size, 224);
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(cli.log_config().level, Level::INFO);
    }

    #[test]
    fn test_class_config_overrides_profile() {
        let cli = Cli::try_parse_from([
            "leafscan-server",
            "--model",
            "leaf.onnx",
            "--profile",
            "condensed",
            "--class-config",
            "classes.json",
        ])
        .unwrap();

        assert_eq!(
            cli.server_config().unwrap().inference.profile,
            ProfileSource::File(PathBuf::from("classes.json"))
        );
    }

    #[test]
    fn test_verbose_and_log_level() {
        let cli = Cli::try_parse_from(["leafscan-server", "-v"]).unwrap();
        assert_eq!(cli.log_config().level, Level::DEBUG);

        let cli = Cli::try_parse_from(["leafscan-server", "-v", "--log-level", "warn"]).unwrap();
        assert_eq!(cli.log_config().level, Level::WARN);
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["leafscan-server", "--log-level", "debg"]).is_err());
    }

    #[test]
    fn test_config_file_with_flag_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leafscan.json");
        InferenceConfig::default()
            .with_model_path("/models/leaf.onnx")
            .with_profile(ProfileSource::Builtin("condensed".to_string()))
            .with_image_size(192)
            .save(&path)
            .unwrap();

        let config_arg = path.to_str().unwrap();
        let cli = Cli::try_parse_from(["leafscan-server", "--config", config_arg]).unwrap();
        let inference = cli.server_config().unwrap().inference;
        assert_eq!(inference.model_path, PathBuf::from("/models/leaf.onnx"));
        assert_eq!(inference.profile, ProfileSource::Builtin("condensed".to_string()));
        assert_eq!(inference.image_size, 192);

        let cli = Cli::try_parse_from([
            "leafscan-server",
            "--config",
            config_arg,
            "--image-size",
            "256",
            "--profile",
            "plantvillage",
        ])
        .unwrap();
        let inference = cli.server_config().unwrap().inference;
        assert_eq!(inference.model_path, PathBuf::from("/models/leaf.onnx"));
        assert_eq!(inference.profile, ProfileSource::Builtin("plantvillage".to_string()));
        assert_eq!(inference.image_size, 256);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["leafscan-server", "--config", "/nonexistent/leafscan.json"])
                .unwrap();
        assert!(cli.server_config().is_err());
    }

    #[test]
    fn test_condensed_profile_flag() {
        let cli = Cli::try_parse_from(["leafscan-server", "--profile", "condensed"]).unwrap();
        assert_eq!(
            cli.server_config().unwrap().inference.profile,
            ProfileSource::Builtin("condensed".to_string())
        );
    }
}
