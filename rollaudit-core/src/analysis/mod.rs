//! Randomness analysis over the successful values of a sample set.
//!
//! Every function here is a pure projection: the same sample set always
//! yields the same report. Failed outcomes never contribute.
//!
//! The overall rating counts how many of the three tests rate good or better.
//! It is qualitative guidance, not a joint hypothesis test.

pub mod chi_square;
pub mod entropy;
pub mod normal;
pub mod variance;

use serde::Serialize;
use std::fmt;

use crate::distribution::Distribution;
use crate::sample::SampleSet;

pub use chi_square::{ChiSquareTest, chi_square};
pub use entropy::{EntropyTest, entropy};
pub use variance::{FrequencyVarianceTest, frequency_variance};

/// Qualitative verdict shared by every test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
    NoData,
}

impl Rating {
    #[must_use]
    pub const fn is_good_or_better(self) -> bool {
        matches!(self, Self::Excellent | Self::Good)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Poor => "POOR",
            Self::NoData => "NO DATA",
        }
    }

    /// Overall rating from the number of tests that rated good or better.
    #[must_use]
    pub const fn from_passing_tests(passing: usize) -> Self {
        match passing {
            0 => Self::Poor,
            1 => Self::Fair,
            2 => Self::Good,
            _ => Self::Excellent,
        }
    }

    #[must_use]
    pub const fn overall_summary(self) -> &'static str {
        match self {
            Self::Excellent => "All tests indicate good randomness",
            Self::Good => "Most tests indicate acceptable randomness",
            Self::Fair => "Some concerns about randomness",
            Self::Poor => "Multiple indicators suggest poor randomness",
            Self::NoData => "No successful rolls to analyze",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full analysis of a non-empty set of successful values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RandomnessReport {
    pub sample_count: usize,
    pub min: u32,
    pub max: u32,
    pub category_count: usize,
    pub expected_frequency: f64,
    pub chi_square: ChiSquareTest,
    pub entropy: EntropyTest,
    pub frequency_variance: FrequencyVarianceTest,
    pub overall: Rating,
}

impl RandomnessReport {
    #[must_use]
    pub fn from_distribution(dist: &Distribution) -> Self {
        let chi_square = ChiSquareTest::from_distribution(dist);
        let entropy = EntropyTest::from_distribution(dist);
        let frequency_variance = FrequencyVarianceTest::from_distribution(dist);
        let passing = [
            chi_square.rating,
            entropy.rating,
            frequency_variance.rating,
        ]
        .into_iter()
        .filter(|rating| rating.is_good_or_better())
        .count();

        Self {
            sample_count: dist.sample_count(),
            min: dist.min(),
            max: dist.max(),
            category_count: dist.category_count(),
            expected_frequency: dist.expected_frequency(),
            chi_square,
            entropy,
            frequency_variance,
            overall: Rating::from_passing_tests(passing),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Analysis {
    NoData,
    Report(RandomnessReport),
}

impl Analysis {
    #[must_use]
    pub const fn report(&self) -> Option<&RandomnessReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::NoData => None,
        }
    }

    #[must_use]
    pub const fn overall(&self) -> Rating {
        match self {
            Self::Report(report) => report.overall,
            Self::NoData => Rating::NoData,
        }
    }
}

/// Analyse the successful outcomes of a sample set.
#[must_use]
pub fn analyze(samples: &SampleSet) -> Analysis {
    Distribution::from_samples(samples).map_or(Analysis::NoData, |dist| {
        Analysis::Report(RandomnessReport::from_distribution(&dist))
    })
}

/// Analyse bare successful values.
#[must_use]
pub fn analyze_values(values: &[u32]) -> Analysis {
    Distribution::from_values(values).map_or(Analysis::NoData, |dist| {
        Analysis::Report(RandomnessReport::from_distribution(&dist))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{FailureKind, Grade, RollOutcome};

    #[test]
    fn overall_rating_counts_passing_tests() {
        assert_eq!(Rating::from_passing_tests(0), Rating::Poor);
        assert_eq!(Rating::from_passing_tests(1), Rating::Fair);
        assert_eq!(Rating::from_passing_tests(2), Rating::Good);
        assert_eq!(Rating::from_passing_tests(3), Rating::Excellent);
    }

    #[test]
    fn failures_only_sample_has_no_data() {
        let samples: SampleSet = std::iter::repeat_with(|| {
            RollOutcome::failed(FailureKind::Transport, "connection reset")
        })
        .take(5)
        .collect();
        let analysis = analyze(&samples);
        assert_eq!(analysis, Analysis::NoData);
        assert_eq!(analysis.overall(), Rating::NoData);
    }

    #[test]
    fn failed_outcomes_are_excluded() {
        let mut samples = SampleSet::new();
        samples.extend([
            RollOutcome::rolled(1, Grade::Success),
            RollOutcome::failed(FailureKind::Http(500), "HTTP 500"),
            RollOutcome::rolled(2, Grade::Failure),
        ]);
        let report = analyze(&samples).report().cloned().unwrap();
        assert_eq!(report.sample_count, 2);
        assert_eq!(report.category_count, 2);
        assert_eq!(report, analyze_values(&[1, 2]).report().cloned().unwrap());
    }

    #[test]
    fn good_or_better_excludes_fair_and_no_data() {
        assert!(Rating::Excellent.is_good_or_better());
        assert!(Rating::Good.is_good_or_better());
        assert!(!Rating::Fair.is_good_or_better());
        assert!(!Rating::NoData.is_good_or_better());
    }
}
