//! rollaudit core
//!
//! Platform-agnostic sampling model and randomness analysis for auditing a
//! remote dice-rolling service. This crate performs no I/O: it turns an
//! accumulated set of roll outcomes into frequency summaries and qualitative
//! goodness-of-fit verdicts.

pub mod analysis;
pub mod distribution;
pub mod outcome;
pub mod sample;

// Re-export commonly used types
pub use analysis::{
    Analysis, ChiSquareTest, EntropyTest, FrequencyVarianceTest, RandomnessReport, Rating,
    analyze, analyze_values, chi_square, entropy, frequency_variance,
};
pub use distribution::{Distribution, ValueTally};
pub use outcome::{DieSpec, DieSpecError, FailureKind, Grade, RollOutcome, ValueOutOfRange};
pub use sample::SampleSet;
