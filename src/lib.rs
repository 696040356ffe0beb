//! # LeafScan
//!
//! Plant leaf disease classification for remote clients: an uploaded image is
//! decoded, normalized into the tensor the model expects, classified by an
//! opaque model, and the score vector is turned into a labeled result.
//!
//! ## Modules
//!
//! - `catalog`: class identifiers, display labels and training counts
//! - `inference`: preprocessing, classifier abstraction, interpretation, pipeline
//! - `config`: pipeline configuration
//! - `utils`: error types and logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leafscan::{InferenceConfig, Pipeline};
//!
//! let config = InferenceConfig::default().with_model_path("model.onnx");
//! let pipeline = Pipeline::from_config(&config)?;
//! let result = pipeline.run(&std::fs::read("leaf.jpg")?)?;
//! println!("{} ({})", result.label, result.confidence_text());
//! ```

pub mod catalog;
pub mod config;
pub mod inference;
pub mod utils;

// Re-export commonly used items for convenience
pub use catalog::{ClassCatalog, ClassPopulationStats, ClassProfile, LabelMapping};
pub use config::{InferenceConfig, ProfileSource, MODEL_PATH_ENV};
pub use inference::{Classifier, ImageTensor, Pipeline, PredictionResponse, PredictionResult, Preprocessor};
pub use utils::error::{LeafScanError, Result};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
