//! Frequency summary over successful roll values
use std::collections::BTreeMap;

use crate::outcome::{Grade, RollOutcome};
use crate::sample::SampleSet;

/// Tally for one observed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTally {
    pub count: usize,
    /// Grade of the first outcome recorded at this value
    pub first_grade: Grade,
}

/// Value → count mapping recomputed from the sample set on every use.
///
/// Only built when at least one successful roll exists, so `min <= max` and
/// `category_count >= 1` always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    tallies: BTreeMap<u32, ValueTally>,
    min: u32,
    max: u32,
    sample_count: usize,
}

impl Distribution {
    /// Summarise the successful outcomes of a sample set.
    #[must_use]
    pub fn from_samples(samples: &SampleSet) -> Option<Self> {
        Self::from_outcomes(samples.outcomes())
    }

    #[must_use]
    pub fn from_outcomes(outcomes: &[RollOutcome]) -> Option<Self> {
        let mut tallies: BTreeMap<u32, ValueTally> = BTreeMap::new();
        let mut sample_count = 0;
        for outcome in outcomes {
            if let RollOutcome::Rolled { value, grade } = outcome {
                sample_count += 1;
                tallies
                    .entry(*value)
                    .and_modify(|t| t.count += 1)
                    .or_insert_with(|| ValueTally {
                        count: 1,
                        first_grade: grade.clone(),
                    });
            }
        }
        Self::build(tallies, sample_count)
    }

    /// Summarise bare values; every tally is graded `SUCCESS`.
    #[must_use]
    pub fn from_values(values: &[u32]) -> Option<Self> {
        let mut tallies: BTreeMap<u32, ValueTally> = BTreeMap::new();
        for &value in values {
            tallies
                .entry(value)
                .and_modify(|t| t.count += 1)
                .or_insert(ValueTally {
                    count: 1,
                    first_grade: Grade::Success,
                });
        }
        Self::build(tallies, values.len())
    }

    fn build(tallies: BTreeMap<u32, ValueTally>, sample_count: usize) -> Option<Self> {
        let min = *tallies.keys().next()?;
        let max = *tallies.keys().next_back()?;
        Some(Self {
            tallies,
            min,
            max,
            sample_count,
        })
    }

    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Number of integer values in the observed `[min, max]` range.
    #[must_use]
    pub const fn category_count(&self) -> usize {
        (self.max - self.min) as usize + 1
    }

    /// Count at `value`, zero for values never observed.
    #[must_use]
    pub fn count_at(&self, value: u32) -> usize {
        self.tallies.get(&value).map_or(0, |t| t.count)
    }

    #[must_use]
    pub fn tally(&self, value: u32) -> Option<&ValueTally> {
        self.tallies.get(&value)
    }

    /// Highest count at any single value.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.tallies.values().map(|t| t.count).max().unwrap_or(0)
    }

    /// Counts for every value in `[min, max]`, unobserved values included.
    pub fn range_counts(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        (self.min..=self.max).map(|value| (value, self.count_at(value)))
    }

    /// Counts of the values that were actually observed.
    pub fn observed_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.tallies.values().map(|t| t.count)
    }

    /// Expected count per value under a uniform distribution over the range.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn expected_frequency(&self) -> f64 {
        self.sample_count as f64 / self.category_count() as f64
    }
}
