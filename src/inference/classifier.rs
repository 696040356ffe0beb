//! Classifier abstraction
//!
//! The model is opaque to the rest of the crate: something that maps one
//! `(1, S, S, 3)` tensor to one score per class. Runtimes implement
//! [`Classifier`]; tests substitute fixed or failing implementations.

use std::sync::Mutex;

use crate::inference::preprocess::ImageTensor;
use crate::utils::error::{LeafScanError, Result};

/// A loaded image classification model
pub trait Classifier: Send + Sync {
    /// Score every class for a single-image batch
    fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>>;

    /// Length of the score vector, when the runtime can tell without running
    fn output_len(&self) -> Option<usize> {
        None
    }

    /// Short description used in logs
    fn name(&self) -> &str;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        (**self).predict(tensor)
    }

    fn output_len(&self) -> Option<usize> {
        (**self).output_len()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Serializes calls into a runtime that must not be invoked concurrently
///
/// Only [`Classifier::predict`] is locked; preprocessing of concurrent
/// requests proceeds in parallel.
pub struct Exclusive<C> {
    inner: Mutex<C>,
    name: String,
}

impl<C: Classifier> Exclusive<C> {
    pub fn new(inner: C) -> Self {
        let name = format!("{} (serialized)", inner.name());
        Self {
            inner: Mutex::new(inner),
            name,
        }
    }
}

impl<C: Classifier> Classifier for Exclusive<C> {
    fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| LeafScanError::Inference("classifier lock poisoned".to_string()))?;
        guard.predict(tensor)
    }

    fn output_len(&self) -> Option<usize> {
        self.inner.lock().ok().and_then(|guard| guard.output_len())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
