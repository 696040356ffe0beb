//! Inference pipeline context
//!
//! Everything a request needs, built once at startup and shared read-only:
//! the preprocessor, the loaded classifier and the class tables.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::{ClassCatalog, ClassPopulationStats, ClassProfile};
use crate::config::InferenceConfig;
use crate::inference::classifier::{Classifier, Exclusive};
use crate::inference::onnx::OnnxClassifier;
use crate::inference::predictor::{Interpreter, PredictionResult};
use crate::inference::preprocess::Preprocessor;
use crate::utils::error::{LeafScanError, Result};

/// Immutable per-process inference context
pub struct Pipeline {
    profile_name: String,
    preprocessor: Preprocessor,
    classifier: Arc<dyn Classifier>,
    interpreter: Interpreter,
}

impl Pipeline {
    /// Assemble the pipeline and check that the classifier's output length
    /// matches the catalog
    ///
    /// When the classifier cannot report its output length, one trial
    /// prediction is run on a blank tensor.
    pub fn new(
        profile: ClassProfile,
        preprocessor: Preprocessor,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self> {
        let profile_name = profile.name.clone();
        let (catalog, labels, stats) = profile
            .into_tables()
            .map_err(|e| LeafScanError::Startup(format!("invalid class profile: {}", e)))?;

        let output_len = match classifier.output_len() {
            Some(len) => len,
            None => {
                debug!("Measuring output length of {} with a blank image", classifier.name());
                classifier
                    .predict(&preprocessor.blank_tensor())
                    .map_err(|e| LeafScanError::Startup(format!("trial prediction on a blank image failed: {}", e)))?
                    .len()
            }
        };

        if output_len != catalog.len() {
            return Err(LeafScanError::Startup(format!(
                "classifier '{}' produces {} scores but profile '{}' lists {} classes",
                classifier.name(),
                output_len,
                profile_name,
                catalog.len()
            )));
        }

        info!(
            "Pipeline ready: profile '{}' ({} classes, stats: {}), classifier {}, input {:?}",
            profile_name,
            catalog.len(),
            stats.is_some(),
            classifier.name(),
            preprocessor.tensor_shape()
        );

        Ok(Self {
            profile_name,
            preprocessor,
            classifier,
            interpreter: Interpreter::new(catalog, labels, stats),
        })
    }

    /// Load the ONNX model and class profile named by the configuration
    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| LeafScanError::Startup(e.to_string()))?;

        let profile = config.class_profile()?;
        let onnx = OnnxClassifier::load(&config.model_path, config.image_size)?;

        let classifier: Arc<dyn Classifier> = if config.serialize_inference {
            warn!("Classifier calls are serialized; concurrent requests will queue for inference");
            Arc::new(Exclusive::new(onnx))
        } else {
            Arc::new(onnx)
        };

        Self::new(profile, Preprocessor::new(config.image_size), classifier)
    }

    /// Classify one encoded image
    ///
    /// CPU-bound; async callers should run it on a blocking thread.
    pub fn run(&self, bytes: &[u8]) -> Result<PredictionResult> {
        let start = Instant::now();

        let tensor = self.preprocessor.preprocess(bytes)?;
        let scores = self.classifier.predict(&tensor)?;
        let result = self.interpreter.interpret(scores)?;

        debug!(
            "Classified {} bytes in {:.1} ms",
            bytes.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(result)
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn catalog(&self) -> &ClassCatalog {
        self.interpreter.catalog()
    }

    pub fn stats(&self) -> Option<&ClassPopulationStats> {
        self.interpreter.stats()
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn image_size(&self) -> u32 {
        self.preprocessor.image_size()
    }
}
