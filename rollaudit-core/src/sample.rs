//! Append-only record of every roll outcome gathered during one run
use serde::Serialize;
use std::collections::BTreeMap;

use crate::outcome::{FailureKind, RollOutcome};

/// Session-wide sample history.
///
/// Outcomes are only ever appended; the set is never reordered, deduplicated,
/// or truncated. Consumers read it through projections and never mutate it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SampleSet {
    outcomes: Vec<RollOutcome>,
}

impl SampleSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    /// Append one batch of outcomes after the batch has fully resolved.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = RollOutcome>) {
        self.outcomes.extend(batch);
    }

    pub fn push(&mut self, outcome: RollOutcome) {
        self.outcomes.push(outcome);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn outcomes(&self) -> &[RollOutcome] {
        &self.outcomes
    }

    /// Values of the successful outcomes, in append order.
    #[must_use]
    pub fn values(&self) -> Vec<u32> {
        self.outcomes.iter().filter_map(RollOutcome::value).collect()
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    /// Number of failed outcomes per error category.
    #[must_use]
    pub fn failure_breakdown(&self) -> BTreeMap<FailureKind, usize> {
        let mut breakdown = BTreeMap::new();
        for kind in self.outcomes.iter().filter_map(RollOutcome::failure_kind) {
            *breakdown.entry(kind).or_insert(0) += 1;
        }
        breakdown
    }
}

impl FromIterator<RollOutcome> for SampleSet {
    fn from_iter<I: IntoIterator<Item = RollOutcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}
