//! ONNX runtime backed by tract
//!
//! Loads a model exported to ONNX (e.g. with tf2onnx from the Keras training
//! run). The export keeps the Keras channels-last input, so the graph is
//! pinned to `f32[1, S, S, 3]` before optimization.

use std::path::Path;

use tract_onnx::prelude::*;
use tracing::{debug, info};

use crate::inference::classifier::Classifier;
use crate::inference::preprocess::{ImageTensor, CHANNELS};
use crate::utils::error::{LeafScanError, Result};

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Classifier running an optimized tract plan
pub struct OnnxClassifier {
    plan: OnnxPlan,
    name: String,
    input_shape: [usize; 4],
    output_len: Option<usize>,
}

impl OnnxClassifier {
    /// Load and optimize the model at `path` for `size`×`size` RGB input
    pub fn load(path: &Path, size: u32) -> Result<Self> {
        if !path.exists() {
            return Err(LeafScanError::Startup(format!(
                "model file not found: {}",
                path.display()
            )));
        }

        let side = size as usize;
        let input_shape = [1, side, side, CHANNELS];

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, side, side, CHANNELS)),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                LeafScanError::Startup(format!("failed to load model {}: {:#}", path.display(), e))
            })?;

        let output_len = plan
            .model()
            .output_fact(0)
            .ok()
            .and_then(|fact| fact.shape.as_concrete().map(|dims| dims.iter().product()));

        info!(
            "Loaded ONNX model {} (input {:?}, outputs {:?})",
            path.display(),
            input_shape,
            output_len
        );

        Ok(Self {
            plan,
            name: format!("onnx:{}", path.display()),
            input_shape,
            output_len,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        if tensor.shape() != self.input_shape {
            return Err(LeafScanError::Inference(format!(
                "tensor shape {:?} does not match model input {:?}",
                tensor.shape(),
                self.input_shape
            )));
        }

        let values = tensor
            .as_slice()
            .ok_or_else(|| LeafScanError::Inference("image tensor is not contiguous".to_string()))?;
        let input = Tensor::from_shape(&self.input_shape, values).map_err(inference_error)?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(inference_error)?;

        let first = outputs
            .first()
            .ok_or_else(|| LeafScanError::Inference("model produced no outputs".to_string()))?;
        let scores: Vec<f32> = first
            .to_array_view::<f32>()
            .map_err(inference_error)?
            .iter()
            .copied()
            .collect();

        debug!("Model returned {} scores", scores.len());
        Ok(scores)
    }

    fn output_len(&self) -> Option<usize> {
        self.output_len
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn inference_error(err: TractError) -> LeafScanError {
    LeafScanError::Inference(format!("{:#}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_startup_error() {
        let err = OnnxClassifier::load(Path::new("/nonexistent/model.onnx"), 224)
            .err()
            .unwrap();
        assert!(matches!(err, LeafScanError::Startup(_)));
    }

    #[test]
    fn test_garbage_model_is_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"definitely not protobuf").unwrap();

        let err = OnnxClassifier::load(&path, 224).err().unwrap();
        assert!(matches!(err, LeafScanError::Startup(_)));
        assert!(err.to_string().contains("model.onnx"));
    }
}
