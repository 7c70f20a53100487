use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Total weight every experiment must distribute across its variants.
pub const TOTAL_WEIGHT: u32 = 100;

/// A single experiment definition as it appears in the static config file.
///
/// `variants[i]` receives `weights[i]` percent of users. Consistency between
/// the two lists is checked when a variant is selected, not when the file is
/// loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub variants: Vec<String>,
    pub weights: Vec<u32>,
}

impl Experiment {
    /// Sum of all weights, widened so a hostile config cannot overflow.
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().map(|w| u64::from(*w)).sum()
    }

    /// True when every variant has exactly one weight.
    pub fn is_balanced(&self) -> bool {
        self.variants.len() == self.weights.len()
    }
}

/// All configured experiments, keyed by unique name.
///
/// Serialized as a plain JSON object:
/// `{ "<name>": { "variants": [...], "weights": [...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentCatalog(pub BTreeMap<String, Experiment>);

impl ExperimentCatalog {
    pub fn get(&self, name: &str) -> Option<&Experiment> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Experiment)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Experiment)> for ExperimentCatalog {
    fn from_iter<I: IntoIterator<Item = (String, Experiment)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Bucket positions owned by one variant: the half-open interval `start..end`
/// inside `0..100`. A zero-weight variant gets an empty range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantRange {
    pub variant: String,
    pub start: u32,
    pub end: u32,
}

impl VariantRange {
    pub fn contains(&self, position: u32) -> bool {
        (self.start..self.end).contains(&position)
    }

    pub fn weight(&self) -> u32 {
        self.end - self.start
    }
}

/// Result of assigning a user to an experiment variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub user_id: String,
    pub experiment_name: String,
    pub variant: String,
}
