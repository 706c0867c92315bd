//! Percentage histograms of per-record risk.
//!
//! Every record lands in exactly one of 101 buckets (0%..=100%) per measure,
//! weighted through its equivalence class.

use serde::{Deserialize, Serialize};

/// Number of integer-percentage buckets, 0 through 100 inclusive.
pub const BUCKETS: usize = 101;

/// Maps a class-level success probability `hits / class_size` to its
/// integer percentage bucket, rounding half to even.
pub fn bucket_for(hits: u64, class_size: u64) -> usize {
    if class_size == 0 {
        return 0;
    }
    let percent = (100 * hits) as f64 / class_size as f64;
    (percent.round_ties_even() as usize).min(BUCKETS - 1)
}

/// Record counts per risk percentage, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskHistogram {
    counts: [u64; BUCKETS],
}

impl Default for RiskHistogram {
    fn default() -> Self {
        Self {
            counts: [0; BUCKETS],
        }
    }
}

impl RiskHistogram {
    /// Creates a histogram with every bucket at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a whole class of `class_size` records whose attacker success
    /// probability is `hits / class_size`.
    pub fn record(&mut self, hits: u64, class_size: u64) {
        if let Some(count) = self.counts.get_mut(bucket_for(hits, class_size)) {
            *count += class_size;
        }
    }

    /// Raw count for a percentage bucket.
    pub fn count(&self, percent: usize) -> u64 {
        self.counts.get(percent).copied().unwrap_or(0)
    }

    /// Sum over all buckets; equals the number of records folded in.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Adds another histogram's counts bucket by bucket.
    pub fn merge(&mut self, other: &Self) {
        for (count, extra) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += extra;
        }
    }

    /// Divides every bucket by the dataset size.
    pub fn normalize(&self, dataset_size: u64) -> RiskDistribution {
        let n = dataset_size.max(1) as f64;
        RiskDistribution(self.counts.iter().map(|&count| count as f64 / n).collect())
    }
}

/// Fraction of records per risk percentage.
///
/// Always holds exactly [`BUCKETS`] entries; serialized as a plain array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct RiskDistribution(Vec<f64>);

impl RiskDistribution {
    /// Fraction of records whose risk rounds to `percent`.
    pub fn probability(&self, percent: usize) -> f64 {
        self.0.get(percent).copied().unwrap_or(0.0)
    }

    /// All buckets, index = percentage.
    pub fn buckets(&self) -> &[f64] {
        &self.0
    }

    /// Sum of all buckets (1.0 up to rounding for a complete scan).
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Fraction of records whose risk is at least `percent`.
    pub fn at_least(&self, percent: usize) -> f64 {
        self.0.iter().skip(percent).sum()
    }
}

impl TryFrom<Vec<f64>> for RiskDistribution {
    type Error = String;

    fn try_from(buckets: Vec<f64>) -> Result<Self, Self::Error> {
        if buckets.len() != BUCKETS {
            return Err(format!(
                "risk distribution needs {} buckets, got {}",
                BUCKETS,
                buckets.len()
            ));
        }
        Ok(Self(buckets))
    }
}

impl From<RiskDistribution> for Vec<f64> {
    fn from(distribution: RiskDistribution) -> Self {
        distribution.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_for_exact_percentages() {
        assert_eq!(bucket_for(1, 1), 100);
        assert_eq!(bucket_for(1, 2), 50);
        assert_eq!(bucket_for(1, 4), 25);
        assert_eq!(bucket_for(0, 5), 0);
    }

    #[test]
    fn test_bucket_for_rounds_half_to_even() {
        // 1/8 = 12.5% and 3/8 = 37.5%
        assert_eq!(bucket_for(1, 8), 12);
        assert_eq!(bucket_for(3, 8), 38);
        // 1/3 = 33.33%, 2/3 = 66.67%
        assert_eq!(bucket_for(1, 3), 33);
        assert_eq!(bucket_for(2, 3), 67);
    }

    #[test]
    fn test_record_weights_by_class_size() {
        let mut histogram = RiskHistogram::new();
        histogram.record(1, 2);
        histogram.record(1, 2);
        histogram.record(1, 1);

        assert_eq!(histogram.count(50), 4);
        assert_eq!(histogram.count(100), 1);
        assert_eq!(histogram.total(), 5);
        assert_eq!(histogram.count(500), 0);
    }

    #[test]
    fn test_merge_adds_buckets() {
        let mut left = RiskHistogram::new();
        left.record(1, 4);
        let mut right = RiskHistogram::new();
        right.record(1, 4);
        right.record(1, 1);

        left.merge(&right);
        assert_eq!(left.count(25), 8);
        assert_eq!(left.count(100), 1);
    }

    #[test]
    fn test_normalize() {
        let mut histogram = RiskHistogram::new();
        histogram.record(1, 3);
        histogram.record(1, 1);

        let distribution = histogram.normalize(4);
        assert_eq!(distribution.buckets().len(), BUCKETS);
        assert!((distribution.probability(33) - 0.75).abs() < 1e-12);
        assert!((distribution.probability(100) - 0.25).abs() < 1e-12);
        assert!((distribution.total() - 1.0).abs() < 1e-12);
        assert!((distribution.at_least(50) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_rejects_wrong_length() {
        let result: Result<RiskDistribution, _> = serde_json::from_str("[0.5, 0.5]");
        assert!(result.is_err());

        let json = serde_json::to_string(&RiskHistogram::new().normalize(1)).unwrap();
        let distribution: RiskDistribution = serde_json::from_str(&json).unwrap();
        assert_eq!(distribution.total(), 0.0);
    }
}
