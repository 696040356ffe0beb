//! Class metadata for the classifier
//!
//! A [`ClassProfile`] is the unit of configuration: an ordered list of class
//! identifiers plus optional per-class training counts. At startup it is split
//! into the three read-only tables the pipeline uses:
//!
//! - [`ClassCatalog`]: index-significant identifiers (position `i` names score `i`)
//! - [`LabelMapping`]: identifier to display label
//! - [`ClassPopulationStats`]: identifier to training-example count (optional)

pub mod profiles;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::error::{LeafScanError, Result};

pub use profiles::{CONDENSED_CLASSES, PLANTVILLAGE_CLASSES, PLANTVILLAGE_COUNTS};

/// Label returned for identifiers missing from the mapping
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Turn a raw class identifier into its display form
pub fn friendly_label(identifier: &str) -> String {
    identifier.replace('_', " ")
}

/// Ordered class identifiers matching the classifier's output positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCatalog {
    classes: Vec<String>,
}

impl ClassCatalog {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Identifier at the given output position
    pub fn identifier(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

/// Display labels keyed by class identifier
#[derive(Debug, Clone)]
pub struct LabelMapping {
    labels: HashMap<String, String>,
}

impl LabelMapping {
    /// Build the mapping for every entry of the catalog
    pub fn from_catalog(catalog: &ClassCatalog) -> Self {
        let labels = catalog
            .iter()
            .map(|id| (id.to_string(), friendly_label(id)))
            .collect();
        Self { labels }
    }

    /// Display label for an identifier, or [`UNKNOWN_LABEL`]
    pub fn label(&self, identifier: &str) -> &str {
        self.labels
            .get(identifier)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Number of training examples per class, attached to responses verbatim
///
/// Entries keep the order they were configured in and serialize as a JSON
/// object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPopulationStats {
    counts: Vec<(String, u64)>,
}

impl ClassPopulationStats {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(class, count)| (class.as_str(), *count))
    }
}

impl FromIterator<(String, u64)> for ClassPopulationStats {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ClassPopulationStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for ClassPopulationStats {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = ClassPopulationStats;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of class identifiers to example counts")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut counts = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, u64>()? {
                    counts.push(entry);
                }
                Ok(ClassPopulationStats { counts })
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// Class tables as read from configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassProfile {
    /// Profile name, reported by the health endpoint
    pub name: String,

    /// Class identifiers in classifier output order
    pub classes: Vec<String>,

    /// Optional training-example counts keyed by identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_label_counts: Option<ClassPopulationStats>,
}

impl ClassProfile {
    /// PlantVillage identifiers with training counts
    pub fn plantvillage() -> Self {
        let counts = PLANTVILLAGE_CLASSES
            .iter()
            .zip(PLANTVILLAGE_COUNTS.iter())
            .map(|(id, &count)| (id.to_string(), count))
            .collect();

        Self {
            name: "plantvillage".to_string(),
            classes: PLANTVILLAGE_CLASSES.iter().map(|s| s.to_string()).collect(),
            class_label_counts: Some(counts),
        }
    }

    /// Short identifiers without training counts
    pub fn condensed() -> Self {
        Self {
            name: "condensed".to_string(),
            classes: CONDENSED_CLASSES.iter().map(|s| s.to_string()).collect(),
            class_label_counts: None,
        }
    }

    /// Look up a built-in profile by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "plantvillage" => Some(Self::plantvillage()),
            "condensed" => Some(Self::condensed()),
            _ => None,
        }
    }

    /// Load a profile from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let profile: Self = serde_json::from_str(&json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check the structural invariants of the tables
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(LeafScanError::Config(format!(
                "profile '{}' has no classes",
                self.name
            )));
        }

        let mut seen = HashSet::with_capacity(self.classes.len());
        for id in &self.classes {
            if !seen.insert(id.as_str()) {
                return Err(LeafScanError::Config(format!(
                    "profile '{}' lists class '{}' more than once",
                    self.name, id
                )));
            }
        }

        if let Some(counts) = &self.class_label_counts {
            let mut counted = HashSet::with_capacity(counts.len());
            for (class, _) in counts.iter() {
                if !seen.contains(class) {
                    return Err(LeafScanError::Config(format!(
                        "profile '{}' has a count for unknown class '{}'",
                        self.name, class
                    )));
                }
                if !counted.insert(class) {
                    return Err(LeafScanError::Config(format!(
                        "profile '{}' counts class '{}' more than once",
                        self.name, class
                    )));
                }
            }
            if let Some(missing) = self.classes.iter().find(|c| !counted.contains(c.as_str())) {
                return Err(LeafScanError::Config(format!(
                    "profile '{}' has no count for class '{}'",
                    self.name, missing
                )));
            }
        }

        Ok(())
    }

    /// Split into the read-only tables used by the pipeline
    pub fn into_tables(self) -> Result<(ClassCatalog, LabelMapping, Option<ClassPopulationStats>)> {
        self.validate()?;

        let catalog = ClassCatalog::new(self.classes);
        let labels = LabelMapping::from_catalog(&catalog);

        Ok((catalog, labels, self.class_label_counts))
    }
}
