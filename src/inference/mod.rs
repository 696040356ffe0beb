//! Inference module: preprocessing, classifier invocation and interpretation
//!
//! A request flows through the pipeline in one pass:
//!
//! ```text
//! bytes -> Preprocessor -> ImageTensor -> Classifier -> scores -> Interpreter -> PredictionResult
//! ```
//!
//! The [`Pipeline`] owns every stage and is built once at startup.

pub mod classifier;
pub mod onnx;
pub mod pipeline;
pub mod predictor;
pub mod preprocess;

// Re-export main types for convenience
pub use classifier::{Classifier, Exclusive};
pub use onnx::OnnxClassifier;
pub use pipeline::Pipeline;
pub use predictor::{argmax, format_ranking, ClassScore, Interpreter, PredictionResponse, PredictionResult};
pub use preprocess::{ImageTensor, Preprocessor, DEFAULT_IMAGE_SIZE};
