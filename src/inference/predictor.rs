//! Prediction interpretation
//!
//! Converts the classifier's raw score vector into a labeled result.

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{ClassCatalog, ClassPopulationStats, LabelMapping};
use crate::utils::error::{LeafScanError, Result, ResultExt};

/// Number of ranked classes logged with each prediction
const LOGGED_RANKING_LEN: usize = 3;

/// A single class with its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScore {
    pub index: usize,
    pub class: String,
    pub score: f32,
}

/// Result of a single prediction
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Position of the winning class in the catalog
    pub predicted_index: usize,

    /// Raw identifier of the winning class
    pub predicted_class: String,

    /// Display label of the winning class
    pub label: String,

    /// Score of the winning class
    pub confidence: f32,

    /// Full score vector in catalog order
    pub scores: Vec<f32>,

    /// Training counts, when the profile carries them
    pub class_label_counts: Option<ClassPopulationStats>,
}

impl PredictionResult {
    /// Confidence with exactly two decimals
    pub fn confidence_text(&self) -> String {
        format!("{:.2}", self.confidence)
    }

    /// The `k` best classes, highest score first (lower index wins ties)
    pub fn top_k(&self, catalog: &ClassCatalog, k: usize) -> Vec<ClassScore> {
        let mut indexed: Vec<(usize, f32)> = self.scores.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        indexed
            .into_iter()
            .take(k)
            .map(|(index, score)| ClassScore {
                index,
                class: catalog.identifier(index).unwrap_or("Unknown").to_string(),
                score,
            })
            .collect()
    }

    /// Wire representation of the result
    pub fn to_response(&self) -> PredictionResponse<'_> {
        PredictionResponse {
            result: &self.label,
            confidence: self.confidence_text(),
            raw_prediction: &self.scores,
            predicted_index: self.predicted_index,
            predicted_class: &self.predicted_class,
            class_label_counts: self.class_label_counts.as_ref(),
        }
    }
}

/// JSON body returned for a successful classification
#[derive(Debug, Serialize)]
pub struct PredictionResponse<'a> {
    pub result: &'a str,
    pub confidence: String,
    pub raw_prediction: &'a [f32],
    pub predicted_index: usize,
    pub predicted_class: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_label_counts: Option<&'a ClassPopulationStats>,
}

/// One-line summary of a ranking, e.g. `Apple___healthy (0.81), Apple___Black_rot (0.10)`
pub fn format_ranking(ranking: &[ClassScore]) -> String {
    ranking
        .iter()
        .map(|c| format!("{} ({:.2})", c.class, c.score))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Index of the largest score; the first one wins on exact ties
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Turns score vectors into [`PredictionResult`]s for one class profile
#[derive(Debug, Clone)]
pub struct Interpreter {
    catalog: ClassCatalog,
    labels: LabelMapping,
    stats: Option<ClassPopulationStats>,
}

impl Interpreter {
    pub fn new(
        catalog: ClassCatalog,
        labels: LabelMapping,
        stats: Option<ClassPopulationStats>,
    ) -> Self {
        Self {
            catalog,
            labels,
            stats,
        }
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> Option<&ClassPopulationStats> {
        self.stats.as_ref()
    }

    /// Interpret one score vector
    pub fn interpret(&self, scores: Vec<f32>) -> Result<PredictionResult> {
        if scores.len() != self.catalog.len() {
            return Err(LeafScanError::Inference(format!(
                "classifier returned {} scores for {} classes",
                scores.len(),
                self.catalog.len()
            )));
        }

        if let Some(bad) = scores.iter().position(|s| !s.is_finite()) {
            return Err(LeafScanError::Inference(format!(
                "classifier returned non-finite score {} at index {}",
                scores[bad], bad
            )));
        }

        debug!("All class scores:");
        for (idx, (class, score)) in self.catalog.iter().zip(&scores).enumerate() {
            debug!("{}: {} -> {:.4}", idx, class, score);
        }

        let predicted_index = argmax(&scores).context("empty score vector")?;
        let predicted_class = self
            .catalog
            .identifier(predicted_index)
            .context("predicted index outside catalog")?
            .to_string();
        let label = self.labels.label(&predicted_class).to_string();
        let confidence = scores[predicted_index];

        info!(
            "Prediction: {} -> {} (Confidence: {:.2})",
            predicted_class, label, confidence
        );

        let result = PredictionResult {
            predicted_index,
            predicted_class,
            label,
            confidence,
            scores,
            class_label_counts: self.stats.clone(),
        };

        info!(
            "Top {}: {}",
            LOGGED_RANKING_LEN,
            format_ranking(&result.top_k(&self.catalog, LOGGED_RANKING_LEN))
        );

        Ok(result)
    }
}
