//! Deterministic experiment bucketing.
//!
//! A user lands in a bucket position derived from
//! `hash("{user_id}_{experiment_name}") mod 100`, read as a base-16 integer.
//! Each variant owns a contiguous run of positions sized by its weight, laid
//! out in declaration order starting at 0. The same pair always yields the
//! same variant, and across many users each variant's share converges to
//! `weight / 100`.

use std::collections::HashMap;

use switchyard_types::error::ExperimentError;
use switchyard_types::experiment::{
    Assignment, Experiment, ExperimentCatalog, TOTAL_WEIGHT, VariantRange,
};

use crate::service::hash::ContentHasher;

/// Assigns users to experiment variants.
///
/// The range table is built once on construction and only read afterwards,
/// so a selector can be shared across request handlers behind an `Arc`.
pub struct ExperimentSelector<H: ContentHasher> {
    catalog: ExperimentCatalog,
    ranges: HashMap<String, Vec<VariantRange>>,
    hasher: H,
}

impl<H: ContentHasher> ExperimentSelector<H> {
    /// Build the selector and the range table for every well-formed
    /// experiment. Malformed experiments are kept in the catalog so that
    /// selecting them reports the precise configuration problem.
    pub fn new(catalog: ExperimentCatalog, hasher: H) -> Self {
        let ranges = catalog
            .iter()
            .filter(|(name, experiment)| validate(name, experiment).is_ok())
            .map(|(name, experiment)| (name.clone(), build_ranges(experiment)))
            .collect();

        Self {
            catalog,
            ranges,
            hasher,
        }
    }

    /// Select the variant for `user_id` in `experiment_name`.
    pub fn select(
        &self,
        experiment_name: &str,
        user_id: &str,
    ) -> Result<Assignment, ExperimentError> {
        let experiment = self
            .catalog
            .get(experiment_name)
            .ok_or_else(|| ExperimentError::NotFound(experiment_name.to_string()))?;
        validate(experiment_name, experiment)?;

        let position = bucket_position(&self.hasher, experiment_name, user_id);
        let variant = self
            .ranges
            .get(experiment_name)
            .and_then(|ranges| locate(ranges, position))
            .ok_or_else(|| ExperimentError::WeightTotalInvalid(experiment_name.to_string()))?;

        tracing::debug!(
            experiment = experiment_name,
            user_id,
            position,
            variant = %variant.variant,
            "assigned variant"
        );

        Ok(Assignment {
            user_id: user_id.to_string(),
            experiment_name: experiment_name.to_string(),
            variant: variant.variant.clone(),
        })
    }

    /// Derived ranges for a well-formed experiment.
    pub fn ranges(&self, experiment_name: &str) -> Option<&[VariantRange]> {
        self.ranges.get(experiment_name).map(Vec::as_slice)
    }

    /// Names of every configured experiment, sorted.
    pub fn experiment_names(&self) -> Vec<&str> {
        self.catalog.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn catalog(&self) -> &ExperimentCatalog {
        &self.catalog
    }
}

/// Bucket position in `0..100` for a user/experiment pair.
pub fn bucket_position<H: ContentHasher + ?Sized>(
    hasher: &H,
    experiment_name: &str,
    user_id: &str,
) -> u32 {
    let digest = hasher.compute_hash(&format!("{user_id}_{experiment_name}"));
    hex_mod(&digest, TOTAL_WEIGHT)
}

/// Remainder of a hex string, read as one big base-16 integer, modulo `m`.
///
/// Horner's rule keeps every intermediate below `16 * m`, so the full
/// 256-bit value never has to be materialized.
fn hex_mod(hex: &str, m: u32) -> u32 {
    hex.chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0, |rem, digit| (rem * 16 + digit) % m)
}

fn validate(name: &str, experiment: &Experiment) -> Result<(), ExperimentError> {
    if !experiment.is_balanced() {
        return Err(ExperimentError::VariantWeightMismatch(name.to_string()));
    }
    if experiment.total_weight() != u64::from(TOTAL_WEIGHT) {
        return Err(ExperimentError::WeightTotalInvalid(name.to_string()));
    }
    Ok(())
}

/// Lay out weights back to back from position 0. Only called for validated
/// experiments, so the final range ends exactly at 100.
fn build_ranges(experiment: &Experiment) -> Vec<VariantRange> {
    let mut start = 0;
    experiment
        .variants
        .iter()
        .zip(&experiment.weights)
        .map(|(variant, weight)| {
            let range = VariantRange {
                variant: variant.clone(),
                start,
                end: start + weight,
            };
            start = range.end;
            range
        })
        .collect()
}

fn locate(ranges: &[VariantRange], position: u32) -> Option<&VariantRange> {
    ranges.iter().find(|range| range.contains(position))
}
