//! Inference configuration
//!
//! Selects the model file, the class profile and the input resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::ClassProfile;
use crate::inference::preprocess::DEFAULT_IMAGE_SIZE;
use crate::utils::error::{LeafScanError, Result};

/// Environment variable naming the model file
pub const MODEL_PATH_ENV: &str = "LEAFSCAN_MODEL_PATH";

/// Where the class tables come from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    /// One of the tables compiled into the crate, by name
    Builtin(String),
    /// A JSON file holding a [`ClassProfile`]
    File(PathBuf),
}

impl Default for ProfileSource {
    fn default() -> Self {
        ProfileSource::Builtin("plantvillage".to_string())
    }
}

/// Configuration for building an inference pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Path to the ONNX export of the classifier
    pub model_path: PathBuf,

    /// Class tables matching the model's output order
    #[serde(default)]
    pub profile: ProfileSource,

    /// Side length of the square model input
    #[serde(default = "default_image_size")]
    pub image_size: u32,

    /// Run classifier calls one at a time
    #[serde(default)]
    pub serialize_inference: bool,
}

fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.onnx"),
            profile: ProfileSource::default(),
            image_size: DEFAULT_IMAGE_SIZE,
            serialize_inference: false,
        }
    }
}

impl InferenceConfig {
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_profile(mut self, profile: ProfileSource) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_image_size(mut self, size: u32) -> Self {
        self.image_size = size;
        self
    }

    pub fn with_serialized_inference(mut self, serialize: bool) -> Self {
        self.serialize_inference = serialize;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.image_size == 0 {
            return Err(LeafScanError::Config("image_size must be positive".to_string()));
        }

        if self.model_path.as_os_str().is_empty() {
            return Err(LeafScanError::Config("model_path must not be empty".to_string()));
        }

        if let ProfileSource::Builtin(name) = &self.profile {
            if ClassProfile::builtin(name).is_none() {
                return Err(LeafScanError::Config(format!(
                    "unknown class profile '{}' (expected 'plantvillage' or 'condensed')",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Resolve the class profile
    pub fn class_profile(&self) -> Result<ClassProfile> {
        match &self.profile {
            ProfileSource::Builtin(name) => ClassProfile::builtin(name).ok_or_else(|| {
                LeafScanError::Startup(format!("unknown class profile '{}'", name))
            }),
            ProfileSource::File(path) => ClassProfile::load(path).map_err(|e| {
                LeafScanError::Startup(format!(
                    "failed to load class profile {}: {}",
                    path.display(),
                    e
                ))
            }),
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
