use crate::classifiers::attribute_class_observers::attribute_class_observer::AttributeClassObserver;
use crate::classifiers::conditional_tests::AttributeSplitSuggestion;
use crate::classifiers::hoeffding_tree::instance_conditional_test::NumericAttributeBinaryTest;
use crate::classifiers::hoeffding_tree::split_criteria::{HellingerSplitCriterion, SplitCriterion};
use crate::core::estimators::GaussianEstimator;
use crate::utils::growable::GrowableVec;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::any::Any;
use std::mem::size_of;
use tracing::{Level, trace};

pub const DEFAULT_NUM_BINS: usize = 10;

const NEGATIVE_CLASS: usize = 0;
const POSITIVE_CLASS: usize = 1;

/// Numeric feature observer scoring splits by the Hellinger distance between
/// the Gaussian fitted to the positive class and the one fitted to the
/// negative class.
///
/// Candidate thresholds are spread evenly between the smallest and largest
/// value seen for any class. Every candidate of one feature carries the same
/// merit, so the first candidate is the one suggested.
pub struct GaussianNumericAttributeClassObserver {
    min_value_observed_per_class: GrowableVec<f64>,
    max_value_observed_per_class: GrowableVec<f64>,
    attribute_value_distribution_per_class: GrowableVec<Option<GaussianEstimator>>,
    num_bins: usize,
}

impl Default for GaussianNumericAttributeClassObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianNumericAttributeClassObserver {
    pub fn new() -> Self {
        Self::with_num_bins(DEFAULT_NUM_BINS)
    }

    pub fn with_num_bins(num_bins: usize) -> Self {
        GaussianNumericAttributeClassObserver {
            min_value_observed_per_class: GrowableVec::new(),
            max_value_observed_per_class: GrowableVec::new(),
            attribute_value_distribution_per_class: GrowableVec::new(),
            num_bins,
        }
    }

    fn estimator(&self, class_val: usize) -> Option<&GaussianEstimator> {
        self.attribute_value_distribution_per_class.get_some(class_val)
    }

    pub fn get_split_point_suggestions(&self) -> Vec<f64> {
        let mut min_value = f64::INFINITY;
        let mut max_value = f64::NEG_INFINITY;
        for (class_val, estimator) in self.attribute_value_distribution_per_class.iter().enumerate() {
            if estimator.is_some() {
                min_value = min_value.min(self.min_value_observed_per_class.value(class_val));
                max_value = max_value.max(self.max_value_observed_per_class.value(class_val));
            }
        }
        if min_value == f64::INFINITY {
            return Vec::new();
        }

        let range = max_value - min_value;
        let mut suggestions: Vec<f64> = (0..self.num_bins)
            .map(|i| range / (self.num_bins as f64 + 1.0) * (i as f64 + 1.0) + min_value)
            .filter(|&v| v > min_value && v < max_value)
            .collect();
        suggestions.sort_by(f64::total_cmp);
        suggestions.dedup();
        suggestions
    }

    /// Estimated `[left, right]` class distributions for a split at
    /// `split_value`, left holding values `<=` the threshold.
    pub fn get_class_dists_resulting_from_binary_split(&self, split_value: f64) -> Vec<Vec<f64>> {
        let num_classes = self.attribute_value_distribution_per_class.len();
        let mut lhs = vec![0.0; num_classes];
        let mut rhs = vec![0.0; num_classes];

        for (class_val, estimator) in self.attribute_value_distribution_per_class.iter().enumerate() {
            let Some(estimator) = estimator else {
                continue;
            };
            if split_value < self.min_value_observed_per_class.value(class_val) {
                rhs[class_val] += estimator.get_total_weight_observed();
            } else if split_value >= self.max_value_observed_per_class.value(class_val) {
                lhs[class_val] += estimator.get_total_weight_observed();
            } else {
                let [less, equal, greater] =
                    estimator.estimated_weight_less_equal_greater_value(split_value);
                lhs[class_val] += less + equal;
                rhs[class_val] += greater;
            }
        }
        vec![lhs, rhs]
    }

    /// Split merit of this feature; negative infinity until both classes
    /// have been observed.
    fn gaussian_merit(&self) -> f64 {
        match (self.estimator(POSITIVE_CLASS), self.estimator(NEGATIVE_CLASS)) {
            (Some(p), Some(q)) => HellingerSplitCriterion::gaussian_hellinger(
                p.get_mean(),
                p.get_variance(),
                q.get_mean(),
                q.get_variance(),
            ),
            _ => f64::NEG_INFINITY,
        }
    }

    /// Class separation of this feature, 1.0 while either class is unseen.
    pub fn feature_hellinger_distance(&self) -> f64 {
        if self.estimator(POSITIVE_CLASS).is_some() && self.estimator(NEGATIVE_CLASS).is_some() {
            self.gaussian_merit()
        } else {
            1.0
        }
    }

    pub fn feature_mean(&self, class_val: usize) -> Option<f64> {
        self.estimator(class_val).map(GaussianEstimator::get_mean)
    }

    pub fn feature_variance(&self, class_val: usize) -> Option<f64> {
        self.estimator(class_val).map(GaussianEstimator::get_variance)
    }
}

impl AttributeClassObserver for GaussianNumericAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        if !att_val.is_finite() || !weight.is_finite() || weight <= 0.0 {
            return;
        }

        let slot = self.attribute_value_distribution_per_class.slot_mut(class_val);
        match slot.as_mut() {
            Some(estimator) => {
                estimator.add_observation(att_val, weight);
                if att_val < self.min_value_observed_per_class.value(class_val) {
                    self.min_value_observed_per_class.set(class_val, att_val);
                }
                if att_val > self.max_value_observed_per_class.value(class_val) {
                    self.max_value_observed_per_class.set(class_val, att_val);
                }
            }
            None => {
                let mut estimator = GaussianEstimator::new();
                estimator.add_observation(att_val, weight);
                *slot = Some(estimator);
                self.min_value_observed_per_class.set(class_val, att_val);
                self.max_value_observed_per_class.set(class_val, att_val);
            }
        }
    }

    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
    ) -> Option<f64> {
        if att_val.is_nan() {
            return None;
        }
        self.estimator(class_val)
            .filter(|est| est.get_total_weight_observed() > 0.0)
            .map(|est| est.probability_density(att_val))
    }

    fn get_best_evaluated_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &[f64],
        att_index: usize,
        _binary_only: bool,
    ) -> Option<AttributeSplitSuggestion> {
        let merit = self.gaussian_merit();
        let mut best: Option<AttributeSplitSuggestion> = None;

        for split_value in self.get_split_point_suggestions() {
            let post_dists = self.get_class_dists_resulting_from_binary_split(split_value);
            if tracing::enabled!(Level::TRACE) {
                let count_merit = criterion.get_merit_of_split(pre_split_dist, &post_dists);
                trace!(att_index, split_value, merit, count_merit, "split candidate");
            }

            let improves = best.as_ref().is_none_or(|b| merit > b.get_merit());
            if improves {
                best = Some(AttributeSplitSuggestion::new(
                    Some(Box::new(NumericAttributeBinaryTest::new(
                        att_index,
                        split_value,
                        true,
                    ))),
                    post_dists,
                    merit,
                ));
            }
        }
        best
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl MemorySized for GaussianNumericAttributeClassObserver {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = 0;
        total += meter.measure_field(&self.min_value_observed_per_class);
        total += meter.measure_field(&self.max_value_observed_per_class);
        total += meter.measure_field(&self.attribute_value_distribution_per_class);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn split_test_of(s: &AttributeSplitSuggestion) -> &NumericAttributeBinaryTest {
        s.get_split_test()
            .and_then(|t| t.as_any().downcast_ref::<NumericAttributeBinaryTest>())
            .unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let obs = GaussianNumericAttributeClassObserver::new();
        assert!(obs.probability_of_attribute_value_given_class(0.0, 0).is_none());
        assert!(obs.get_split_point_suggestions().is_empty());
        let criterion = HellingerSplitCriterion::new();
        assert!(
            obs.get_best_evaluated_split_suggestion(&criterion, &[], 0, true)
                .is_none()
        );
    }

    #[test]
    fn test_density_peaks_near_class_mean() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        for v in [1.0, 3.0, 2.0] {
            obs.observe_attribute_class(v, 0, 1.0);
        }
        let center = obs.probability_of_attribute_value_given_class(2.0, 0).unwrap();
        let far = obs.probability_of_attribute_value_given_class(5.0, 0).unwrap();
        assert!(center > far);
        assert!(obs.probability_of_attribute_value_given_class(2.0, 1).is_none());
    }

    #[test]
    fn test_ignores_non_finite_values_and_non_positive_weight() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        obs.observe_attribute_class(f64::NAN, 0, 1.0);
        obs.observe_attribute_class(f64::INFINITY, 0, 1.0);
        obs.observe_attribute_class(10.0, 0, 0.0);
        obs.observe_attribute_class(10.0, 0, -1.0);
        assert!(obs.feature_mean(0).is_none());

        obs.observe_attribute_class(10.0, 0, 2.0);
        let p = obs.probability_of_attribute_value_given_class(10.0, 0).unwrap();
        assert!(approx_eq(p, 1.0, EPS));
    }

    #[test]
    fn test_split_points_strictly_inside_observed_range() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        obs.observe_attribute_class(0.0, 0, 1.0);
        obs.observe_attribute_class(11.0, 1, 1.0);

        let points = obs.get_split_point_suggestions();
        assert_eq!(points.len(), DEFAULT_NUM_BINS);
        for (i, p) in points.iter().enumerate() {
            assert!(approx_eq(*p, (i + 1) as f64, EPS));
        }
    }

    #[test]
    fn test_constant_feature_has_no_split_points() {
        let mut obs = GaussianNumericAttributeClassObserver::with_num_bins(4);
        obs.observe_attribute_class(2.0, 0, 1.0);
        obs.observe_attribute_class(2.0, 1, 1.0);
        assert!(obs.get_split_point_suggestions().is_empty());
    }

    #[test]
    fn test_binary_split_routes_whole_classes_outside_their_range() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        for _ in 0..4 {
            obs.observe_attribute_class(1.0, 0, 1.0);
        }
        for _ in 0..3 {
            obs.observe_attribute_class(9.0, 1, 1.0);
        }
        let dists = obs.get_class_dists_resulting_from_binary_split(5.0);
        assert_eq!(dists, vec![vec![4.0, 0.0], vec![0.0, 3.0]]);
    }

    #[test]
    fn test_binary_split_conserves_class_weight() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            obs.observe_attribute_class(v, 0, 1.0);
            obs.observe_attribute_class(v + 1.5, 1, 2.0);
        }
        let dists = obs.get_class_dists_resulting_from_binary_split(3.2);
        assert!(approx_eq(dists[0][0] + dists[1][0], 5.0, 1e-6));
        assert!(approx_eq(dists[0][1] + dists[1][1], 10.0, 1e-6));
        assert!(dists[0][0] > dists[1][0]);
    }

    #[test]
    fn test_first_candidate_wins_with_equal_merits() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        for v in [0.0, 1.0, 2.0] {
            obs.observe_attribute_class(v, 0, 1.0);
        }
        for v in [9.0, 10.0, 11.0] {
            obs.observe_attribute_class(v, 1, 1.0);
        }
        let criterion = HellingerSplitCriterion::new();
        let best = obs
            .get_best_evaluated_split_suggestion(&criterion, &[3.0, 3.0], 7, true)
            .unwrap();
        let test = split_test_of(&best);
        assert_eq!(test.attribute_index(), 7);
        assert!(approx_eq(test.split_value(), 1.0, EPS));
        assert!(approx_eq(best.get_merit(), obs.feature_hellinger_distance(), EPS));
        assert!(best.get_merit() > 0.9);
    }

    #[test]
    fn test_zero_variance_classes_keep_first_candidate() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        for _ in 0..100 {
            obs.observe_attribute_class(1.0, 0, 1.0);
        }
        for _ in 0..50 {
            obs.observe_attribute_class(9.0, 1, 1.0);
        }
        let criterion = HellingerSplitCriterion::new();
        let best = obs
            .get_best_evaluated_split_suggestion(&criterion, &[100.0, 50.0], 0, true)
            .unwrap();
        assert!(best.get_merit().is_nan());
        assert!(approx_eq(split_test_of(&best).split_value(), 1.0 + 8.0 / 11.0, EPS));
        assert_eq!(
            best.get_resulting_class_distributions(),
            &[vec![100.0, 0.0], vec![0.0, 50.0]]
        );
    }

    #[test]
    fn test_single_class_merit_is_negative_infinity() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        obs.observe_attribute_class(1.0, 0, 1.0);
        obs.observe_attribute_class(3.0, 0, 1.0);
        let criterion = HellingerSplitCriterion::new();
        let best = obs
            .get_best_evaluated_split_suggestion(&criterion, &[2.0], 0, true)
            .unwrap();
        assert_eq!(best.get_merit(), f64::NEG_INFINITY);
        assert_eq!(obs.feature_hellinger_distance(), 1.0);
    }

    #[test]
    fn test_feature_statistics_per_class() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        obs.observe_attribute_class(1.0, 0, 1.0);
        obs.observe_attribute_class(3.0, 0, 1.0);
        assert!(approx_eq(obs.feature_mean(0).unwrap(), 2.0, EPS));
        assert!(approx_eq(obs.feature_variance(0).unwrap(), 2.0, EPS));
        assert!(obs.feature_mean(1).is_none());
        assert!(obs.feature_variance(4).is_none());
    }

    #[test]
    fn test_memory_grows_with_classes() {
        let mut obs = GaussianNumericAttributeClassObserver::new();
        let empty = obs.deep_size();
        obs.observe_attribute_class(1.0, 3, 1.0);
        assert!(obs.deep_size() > empty);
    }
}
