//! Application state for the LeafScan server
//!
//! Holds the inference pipeline and server settings. Everything here is
//! created before the listener binds and only read afterwards.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use leafscan::{InferenceConfig, Pipeline};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,
    /// Pipeline configuration (model, class profile, input size)
    pub inference: InferenceConfig,
    /// Directory served under `/static`, if any
    pub static_dir: Option<PathBuf>,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            inference: InferenceConfig::default(),
            static_dir: None,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Loaded model and class tables
    pub pipeline: Arc<Pipeline>,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
