//! Chi-square goodness-of-fit against a uniform distribution
use serde::Serialize;

use super::Rating;
use super::normal::upper_tail;
use crate::distribution::Distribution;

/// Degrees of freedom above which the normal approximation is used.
pub const NORMAL_APPROXIMATION_DF: usize = 30;

/// 5% critical values of the chi-square distribution, keyed by degrees of
/// freedom. Lookups snap to the nearest entry; ties go to the smaller df.
pub const CRITICAL_VALUES_5PCT: [(usize, f64); 4] =
    [(1, 3.841), (10, 18.307), (20, 31.410), (30, 43.773)];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    /// Coarse p-value; below the normal-approximation cutoff it is only ever
    /// bucketed to 0.05 or 0.01
    pub p_value: f64,
    pub rating: Rating,
}

impl ChiSquareTest {
    #[must_use]
    pub const fn no_data() -> Self {
        Self {
            statistic: 0.0,
            degrees_of_freedom: 0,
            p_value: 1.0,
            rating: Rating::NoData,
        }
    }

    #[must_use]
    pub fn from_distribution(dist: &Distribution) -> Self {
        let expected = dist.expected_frequency();
        #[allow(clippy::cast_precision_loss)]
        let statistic: f64 = dist
            .range_counts()
            .map(|(_, observed)| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        let degrees_of_freedom = dist.category_count() - 1;
        let p_value = approximate_p_value(statistic, degrees_of_freedom);

        Self {
            statistic,
            degrees_of_freedom,
            p_value,
            rating: rate_p_value(p_value),
        }
    }

    #[must_use]
    pub const fn assessment(&self) -> &'static str {
        match self.rating {
            Rating::Excellent | Rating::Good => "Distribution appears random",
            Rating::Fair => "Some deviation from randomness",
            Rating::Poor => "Significant deviation from randomness",
            Rating::NoData => "No data",
        }
    }
}

/// Chi-square test over bare values.
#[must_use]
pub fn chi_square(values: &[u32]) -> ChiSquareTest {
    Distribution::from_values(values)
        .as_ref()
        .map_or_else(ChiSquareTest::no_data, ChiSquareTest::from_distribution)
}

#[must_use]
pub fn approximate_p_value(statistic: f64, degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom > NORMAL_APPROXIMATION_DF {
        #[allow(clippy::cast_precision_loss)]
        let df = degrees_of_freedom as f64;
        let z = (statistic - df) / (2.0 * df).sqrt();
        upper_tail(z)
    } else if statistic < nearest_critical_value(degrees_of_freedom) {
        0.05
    } else {
        0.01
    }
}

#[must_use]
pub fn nearest_critical_value(degrees_of_freedom: usize) -> f64 {
    CRITICAL_VALUES_5PCT
        .iter()
        .min_by_key(|(df, _)| df.abs_diff(degrees_of_freedom))
        .map_or(CRITICAL_VALUES_5PCT[0].1, |(_, critical)| *critical)
}

fn rate_p_value(p_value: f64) -> Rating {
    if p_value > 0.05 {
        Rating::Good
    } else if p_value > 0.01 {
        Rating::Fair
    } else {
        Rating::Poor
    }
}
