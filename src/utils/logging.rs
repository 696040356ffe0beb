//! Logging setup
//!
//! Installs the process-wide `tracing` subscriber. Per-class scores are
//! emitted at debug level, the chosen class at info.

use std::io::IsTerminal;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use super::error::{LeafScanError, Result};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Most verbose level that is printed
    pub level: Level,
    /// Print module paths and thread ids with each event
    pub detailed: bool,
    /// Color the output
    pub ansi_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            detailed: false,
            ansi_colors: std::io::stdout().is_terminal(),
        }
    }
}

impl LogConfig {
    /// Debug level with module paths, so every class score is visible
    pub fn verbose() -> Self {
        Self {
            level: Level::DEBUG,
            detailed: true,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Initialize process-wide logging with the given configuration
///
/// Fails if a global subscriber has already been installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level)
        .with_ansi(config.ansi_colors)
        .with_target(config.detailed)
        .with_thread_ids(config.detailed)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LeafScanError::Startup(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = LogConfig::default();
        assert_eq!(default.level, Level::INFO);
        assert!(!default.detailed);

        let verbose = LogConfig::verbose();
        assert_eq!(verbose.level, Level::DEBUG);
        assert!(verbose.detailed);
        assert_eq!(verbose.ansi_colors, default.ansi_colors);
    }

    #[test]
    fn test_explicit_level_wins_over_preset() {
        assert_eq!(LogConfig::verbose().with_level(Level::WARN).level, Level::WARN);
    }

    #[test]
    fn test_second_init_is_startup_error() {
        let config = LogConfig::default().with_level(Level::ERROR);
        let first = init_logging(&config);
        let second = init_logging(&config);

        // Another test binary may have installed a subscriber first
        assert!(first.is_err() || second.is_err());
        assert!(matches!(second, Err(LeafScanError::Startup(_))));
    }
}
