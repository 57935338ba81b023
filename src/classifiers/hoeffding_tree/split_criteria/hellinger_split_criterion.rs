use crate::classifiers::hoeffding_tree::split_criteria::split_criterion::SplitCriterion;
use crate::utils::math::log2;
use crate::utils::memory::MemorySized;

pub const DEFAULT_MIN_BRANCH_FRACTION: f64 = 0.01;

/// Hellinger distance split criterion for skewed two-class data.
///
/// Class 0 is the negative class and class 1 the positive one.
#[derive(Clone, Debug)]
pub struct HellingerSplitCriterion {
    min_branch_fraction: f64,
}

impl Default for HellingerSplitCriterion {
    fn default() -> Self {
        Self::new()
    }
}

impl HellingerSplitCriterion {
    pub fn new() -> Self {
        Self::with_min_branch_fraction(DEFAULT_MIN_BRANCH_FRACTION)
    }

    pub fn with_min_branch_fraction(min_branch_fraction: f64) -> Self {
        Self {
            min_branch_fraction,
        }
    }

    pub fn min_branch_fraction(&self) -> f64 {
        self.min_branch_fraction
    }

    /// Count based distance between the left/right partitions of the two
    /// classes. Yields 0.0 when the distribution cannot be evaluated.
    pub fn compute_hellinger(dist: &[Vec<f64>]) -> f64 {
        if dist.len() < 2 {
            return 0.0;
        }
        let cell = |branch: usize, class: usize| dist.get(branch).and_then(|d| d.get(class)).copied();
        let (Some(left_neg), Some(left_pos), Some(right_neg), Some(right_pos)) =
            (cell(0, 0), cell(0, 1), cell(1, 0), cell(1, 1))
        else {
            return 0.0;
        };

        let total_neg = left_neg + right_neg;
        let total_pos = left_pos + right_pos;

        let left = (left_neg / total_neg).sqrt() - (left_pos / total_pos).sqrt();
        let right = (right_neg / total_neg).sqrt() - (right_pos / total_pos).sqrt();
        (left.powi(2) + right.powi(2)).sqrt()
    }

    /// Distance between two normal distributions `P` and `Q` given their
    /// means and variances.
    pub fn gaussian_hellinger(p_mean: f64, p_variance: f64, q_mean: f64, q_variance: f64) -> f64 {
        let p_std_dev = p_variance.sqrt();
        let q_std_dev = q_variance.sqrt();
        let variance_sum = p_variance + q_variance;

        let overlap = ((2.0 * p_std_dev * q_std_dev) / variance_sum).sqrt()
            * (-0.25 * (p_mean - q_mean).powi(2) / variance_sum).exp();
        (1.0 - overlap).max(0.0).sqrt()
    }

    /// Number of branches holding strictly more than `min_fraction` of the
    /// total weight.
    pub fn num_subsets_greater_than_frac(distributions: &[Vec<f64>], min_fraction: f64) -> usize {
        let sums: Vec<f64> = distributions.iter().map(|d| d.iter().sum()).collect();
        let total: f64 = sums.iter().sum();
        sums.iter().filter(|&&s| s / total > min_fraction).count()
    }
}

impl SplitCriterion for HellingerSplitCriterion {
    fn get_range_of_merit(&self, pre_split_distribution: &[f64]) -> f64 {
        let num_classes = pre_split_distribution.len().max(2);
        log2(num_classes as f64)
    }

    fn get_merit_of_split(
        &self,
        _pre_split_distribution: &[f64],
        post_split_dists: &[Vec<f64>],
    ) -> f64 {
        if Self::num_subsets_greater_than_frac(post_split_dists, self.min_branch_fraction) < 2 {
            return f64::NEG_INFINITY;
        }
        Self::compute_hellinger(post_split_dists)
    }
}

impl MemorySized for HellingerSplitCriterion {}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn test_perfect_separation_reaches_sqrt_two() {
        let dist = vec![vec![10.0, 0.0], vec![0.0, 4.0]];
        let h = HellingerSplitCriterion::compute_hellinger(&dist);
        assert!(approx_eq(h, 2.0f64.sqrt(), EPS));
    }

    #[test]
    fn test_proportional_branches_have_zero_distance() {
        let dist = vec![vec![20.0, 2.0], vec![80.0, 8.0]];
        assert!(approx_eq(HellingerSplitCriterion::compute_hellinger(&dist), 0.0, EPS));
    }

    #[test]
    fn test_unevaluable_distributions_return_zero() {
        assert_eq!(HellingerSplitCriterion::compute_hellinger(&[vec![1.0, 2.0]]), 0.0);
        assert_eq!(
            HellingerSplitCriterion::compute_hellinger(&[vec![1.0], vec![2.0, 3.0]]),
            0.0
        );
        assert_eq!(HellingerSplitCriterion::compute_hellinger(&[]), 0.0);
    }

    #[test]
    fn test_gaussian_form_is_zero_for_identical_distributions() {
        let h = HellingerSplitCriterion::gaussian_hellinger(2.0, 1.5, 2.0, 1.5);
        assert!(approx_eq(h, 0.0, 1e-7));
    }

    #[test]
    fn test_gaussian_form_never_nan_for_identical_distributions() {
        for (mean, variance) in [(2.0, 1.5), (-3.7, 0.3), (1e6, 7.1), (0.1, 1e-8), (42.0, 123.456)] {
            let h = HellingerSplitCriterion::gaussian_hellinger(mean, variance, mean, variance);
            assert!(!h.is_nan(), "mean={mean} variance={variance}");
            assert!(approx_eq(h, 0.0, 1e-7), "mean={mean} variance={variance} h={h}");
        }
    }

    #[test]
    fn test_gaussian_form_with_shifted_means() {
        let h = HellingerSplitCriterion::gaussian_hellinger(2.0, 1.0, 0.0, 1.0);
        let expected = (1.0 - (-0.25 * 4.0 / 2.0f64).exp()).sqrt();
        assert!(approx_eq(h, expected, EPS));
    }

    #[test]
    fn test_gaussian_form_grows_with_separation() {
        let near = HellingerSplitCriterion::gaussian_hellinger(0.5, 1.0, 0.0, 1.0);
        let far = HellingerSplitCriterion::gaussian_hellinger(5.0, 1.0, 0.0, 1.0);
        assert!(far > near);
        assert!(far <= 1.0);
    }

    #[test]
    fn test_gaussian_form_with_zero_variances_is_nan() {
        let h = HellingerSplitCriterion::gaussian_hellinger(9.0, 0.0, 1.0, 0.0);
        assert!(h.is_nan());
    }

    #[test]
    fn test_range_of_merit_uses_at_least_two_classes() {
        let c = HellingerSplitCriterion::new();
        assert!(approx_eq(c.get_range_of_merit(&[5.0]), 1.0, EPS));
        assert!(approx_eq(c.get_range_of_merit(&[5.0, 1.0]), 1.0, EPS));
        assert!(approx_eq(c.get_range_of_merit(&[1.0, 1.0, 1.0, 1.0]), 2.0, EPS));
    }

    #[test]
    fn test_counts_branches_above_fraction() {
        let dist = vec![vec![6.0, 30.0], vec![14.0, 50.0]];
        assert_eq!(HellingerSplitCriterion::num_subsets_greater_than_frac(&dist, 0.01), 2);
        let lopsided = vec![vec![0.5, 0.0], vec![60.0, 40.0]];
        assert_eq!(HellingerSplitCriterion::num_subsets_greater_than_frac(&lopsided, 0.01), 1);
    }

    #[test]
    fn test_merit_rejects_tiny_branches() {
        let c = HellingerSplitCriterion::new();
        let lopsided = vec![vec![0.5, 0.0], vec![60.0, 40.0]];
        assert_eq!(c.get_merit_of_split(&[60.5, 40.0], &lopsided), f64::NEG_INFINITY);
    }

    #[test]
    fn test_merit_matches_count_hellinger() {
        let c = HellingerSplitCriterion::with_min_branch_fraction(0.05);
        let dist = vec![vec![6.0, 30.0], vec![14.0, 50.0]];
        let merit = c.get_merit_of_split(&[20.0, 80.0], &dist);
        assert!(approx_eq(merit, HellingerSplitCriterion::compute_hellinger(&dist), EPS));
        assert!(merit > 0.0);
    }
}
