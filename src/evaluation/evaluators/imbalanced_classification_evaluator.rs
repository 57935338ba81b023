use crate::core::instances::Instance;
use crate::evaluation::{Measurement, PerformanceEvaluator};
use crate::utils::math::max_index;

const POSITIVE_CLASS: usize = 1;

/// Weighted binary confusion matrix with class 1 as the positive
/// (minority) class.
///
/// Reports `accuracy`, `kappa`, `precision`, `recall`, `specificity`, `f1`
/// and `g_mean`. Ratios with an empty denominator are NaN.
#[derive(Debug, Default, Clone)]
pub struct ImbalancedClassificationEvaluator {
    true_positive: f64,
    false_positive: f64,
    true_negative: f64,
    false_negative: f64,
}

#[inline]
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        f64::NAN
    }
}

impl ImbalancedClassificationEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_weight(&self) -> f64 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total_weight())
    }

    pub fn kappa(&self) -> f64 {
        let total = self.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        let predicted_positive = (self.true_positive + self.false_positive) / total;
        let actual_positive = (self.true_positive + self.false_negative) / total;
        let chance = predicted_positive * actual_positive
            + (1.0 - predicted_positive) * (1.0 - actual_positive);
        let denominator = 1.0 - chance;
        if denominator.abs() > f64::EPSILON {
            (self.accuracy() - chance) / denominator
        } else {
            f64::NAN
        }
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.true_negative, self.true_negative + self.false_positive)
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        ratio(2.0 * p * r, p + r)
    }

    /// Geometric mean of the per-class recalls.
    pub fn g_mean(&self) -> f64 {
        (self.recall() * self.specificity()).sqrt()
    }
}

impl PerformanceEvaluator for ImbalancedClassificationEvaluator {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn add_result(&mut self, example: &dyn Instance, class_votes: Vec<f64>) {
        let weight = example.weight();
        if weight <= 0.0 || class_votes.is_empty() {
            return;
        }
        let actual = match usize::try_from(example.class_label()) {
            Ok(label) if label <= POSITIVE_CLASS => label,
            _ => return,
        };
        let predicted = max_index(&class_votes);

        match (actual == POSITIVE_CLASS, predicted == POSITIVE_CLASS) {
            (true, true) => self.true_positive += weight,
            (true, false) => self.false_negative += weight,
            (false, true) => self.false_positive += weight,
            (false, false) => self.true_negative += weight,
        }
    }

    fn performance(&self) -> Vec<Measurement> {
        vec![
            Measurement::new("accuracy", self.accuracy()),
            Measurement::new("kappa", self.kappa()),
            Measurement::new("precision", self.precision()),
            Measurement::new("recall", self.recall()),
            Measurement::new("specificity", self.specificity()),
            Measurement::new("f1", self.f1()),
            Measurement::new("g_mean", self.g_mean()),
        ]
    }
}
