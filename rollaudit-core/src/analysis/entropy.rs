//! Shannon entropy of the observed value distribution
use serde::Serialize;

use super::Rating;
use crate::distribution::Distribution;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntropyTest {
    /// Observed entropy in bits
    pub entropy: f64,
    /// `log2` of the category count
    pub max_entropy: f64,
    /// `entropy / max_entropy`, 0 for a single-category range
    pub ratio: f64,
    pub rating: Rating,
}

impl EntropyTest {
    #[must_use]
    pub const fn no_data() -> Self {
        Self {
            entropy: 0.0,
            max_entropy: 0.0,
            ratio: 0.0,
            rating: Rating::NoData,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_distribution(dist: &Distribution) -> Self {
        let total = dist.sample_count() as f64;
        let entropy = dist
            .observed_counts()
            .filter(|&count| count > 0)
            .map(|count| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum::<f64>()
            .max(0.0);
        let max_entropy = (dist.category_count() as f64).log2();
        let ratio = if max_entropy > 0.0 {
            (entropy / max_entropy).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            entropy,
            max_entropy,
            ratio,
            rating: rate_ratio(ratio),
        }
    }

    #[must_use]
    pub const fn assessment(&self) -> &'static str {
        match self.rating {
            Rating::Excellent => "Very high entropy",
            Rating::Good => "High entropy",
            Rating::Fair => "Moderate entropy",
            Rating::Poor => "Low entropy, not very random",
            Rating::NoData => "No data",
        }
    }
}

#[must_use]
pub fn entropy(values: &[u32]) -> EntropyTest {
    Distribution::from_values(values)
        .as_ref()
        .map_or_else(EntropyTest::no_data, EntropyTest::from_distribution)
}

fn rate_ratio(ratio: f64) -> Rating {
    if ratio > 0.95 {
        Rating::Excellent
    } else if ratio > 0.90 {
        Rating::Good
    } else if ratio > 0.80 {
        Rating::Fair
    } else {
        Rating::Poor
    }
}
