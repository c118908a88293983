//! Spread of per-value frequencies around the uniform expectation
use serde::Serialize;

use super::Rating;
use crate::distribution::Distribution;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrequencyVarianceTest {
    pub std_dev: f64,
    /// Poisson-style expectation, `sqrt(expected frequency)`
    pub expected_std_dev: f64,
    pub ratio: f64,
    pub rating: Rating,
}

impl FrequencyVarianceTest {
    #[must_use]
    pub const fn no_data() -> Self {
        Self {
            std_dev: 0.0,
            expected_std_dev: 0.0,
            ratio: 0.0,
            rating: Rating::NoData,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_distribution(dist: &Distribution) -> Self {
        let expected = dist.expected_frequency();
        let variance = dist
            .range_counts()
            .map(|(_, observed)| {
                let diff = observed as f64 - expected;
                diff * diff
            })
            .sum::<f64>()
            / dist.category_count() as f64;
        let std_dev = variance.sqrt();
        let expected_std_dev = expected.sqrt();
        let ratio = if expected_std_dev > 0.0 {
            std_dev / expected_std_dev
        } else {
            0.0
        };

        Self {
            std_dev,
            expected_std_dev,
            ratio,
            rating: rate_ratio(ratio),
        }
    }

    #[must_use]
    pub const fn assessment(&self) -> &'static str {
        match self.rating {
            Rating::Excellent | Rating::Good => "Variance within expected range",
            Rating::Fair => "Variance slightly outside expected range",
            Rating::Poor => "Variance significantly different from expected",
            Rating::NoData => "No data",
        }
    }
}

#[must_use]
pub fn frequency_variance(values: &[u32]) -> FrequencyVarianceTest {
    Distribution::from_values(values).as_ref().map_or_else(
        FrequencyVarianceTest::no_data,
        FrequencyVarianceTest::from_distribution,
    )
}

fn rate_ratio(ratio: f64) -> Rating {
    if (0.8..=1.2).contains(&ratio) {
        Rating::Good
    } else if (0.6..=1.4).contains(&ratio) {
        Rating::Fair
    } else {
        Rating::Poor
    }
}
