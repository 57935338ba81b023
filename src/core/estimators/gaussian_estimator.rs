use crate::utils::math::normal_probability;
use crate::utils::memory::MemorySized;
use std::f64::consts::PI;

/// Online weighted mean and variance of one feature for one class.
///
/// Uses Welford's update; the variance is the sample variance
/// `variance_sum / (weight_sum - 1)` once more than one unit of weight has
/// been seen, and zero before that.
#[derive(Clone, Debug, Default)]
pub struct GaussianEstimator {
    weight_sum: f64,
    mean: f64,
    variance_sum: f64,
}

impl GaussianEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-finite values are treated as missing and ignored.
    #[inline]
    pub fn add_observation(&mut self, value: f64, weight: f64) {
        if !value.is_finite() {
            return;
        }
        if self.weight_sum <= 0.0 {
            self.mean = value;
            self.weight_sum = weight;
            return;
        }
        self.weight_sum += weight;
        let delta = value - self.mean;
        self.mean += weight * delta / self.weight_sum;
        // second factor uses the updated mean
        self.variance_sum += weight * delta * (value - self.mean);
    }

    pub fn get_mean(&self) -> f64 {
        self.mean
    }

    pub fn get_variance(&self) -> f64 {
        if self.weight_sum > 1.0 {
            self.variance_sum / (self.weight_sum - 1.0)
        } else {
            0.0
        }
    }

    pub fn get_std_dev(&self) -> f64 {
        self.get_variance().sqrt()
    }

    pub fn get_total_weight_observed(&self) -> f64 {
        self.weight_sum
    }

    pub fn probability_density(&self, value: f64) -> f64 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        let std_dev = self.get_std_dev();
        if std_dev > 0.0 {
            let diff = value - self.mean;
            (1.0 / ((2.0 * PI).sqrt() * std_dev)) * (-(diff * diff) / (2.0 * std_dev * std_dev)).exp()
        } else if value == self.mean {
            1.0
        } else {
            0.0
        }
    }

    /// Splits the observed weight into `[less, equal, greater]` than `value`.
    pub fn estimated_weight_less_equal_greater_value(&self, value: f64) -> [f64; 3] {
        let equal_weight = self.probability_density(value) * self.weight_sum;
        let std_dev = self.get_std_dev();
        let less_weight = if std_dev > 0.0 {
            normal_probability((value - self.mean) / std_dev) * self.weight_sum - equal_weight
        } else if value < self.mean {
            self.weight_sum - equal_weight
        } else {
            0.0
        };
        let greater_weight = (self.weight_sum - equal_weight - less_weight).max(0.0);
        [less_weight, equal_weight, greater_weight]
    }
}

impl MemorySized for GaussianEstimator {}
