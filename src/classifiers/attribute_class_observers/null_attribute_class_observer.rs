use crate::classifiers::attribute_class_observers::AttributeClassObserver;
use crate::classifiers::conditional_tests::AttributeSplitSuggestion;
use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::utils::memory::MemorySized;
use std::any::Any;

/// Observer that keeps nothing, which takes its feature out of split
/// evaluation.
#[derive(Debug, Default)]
pub struct NullAttributeClassObserver;

impl NullAttributeClassObserver {
    pub fn new() -> Self {
        NullAttributeClassObserver
    }
}

impl AttributeClassObserver for NullAttributeClassObserver {
    fn observe_attribute_class(&mut self, _att_val: f64, _class_val: usize, _weight: f64) {}

    fn probability_of_attribute_value_given_class(
        &self,
        _att_val: f64,
        _class_val: usize,
    ) -> Option<f64> {
        Some(0.0)
    }

    fn get_best_evaluated_split_suggestion(
        &self,
        _criterion: &dyn SplitCriterion,
        _pre_split_dist: &[f64],
        _att_index: usize,
        _binary_only: bool,
    ) -> Option<AttributeSplitSuggestion> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl MemorySized for NullAttributeClassObserver {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::hoeffding_tree::split_criteria::HellingerSplitCriterion;

    #[test]
    fn test_never_suggests_a_split() {
        let mut obs = NullAttributeClassObserver::new();
        for i in 0..100 {
            obs.observe_attribute_class(i as f64, i % 2, 1.0);
        }
        let criterion = HellingerSplitCriterion::new();
        assert!(
            obs.get_best_evaluated_split_suggestion(&criterion, &[50.0, 50.0], 0, true)
                .is_none()
        );
        assert_eq!(obs.probability_of_attribute_value_given_class(3.0, 1), Some(0.0));
    }

    #[test]
    fn test_has_no_heap_footprint() {
        let obs: Box<dyn AttributeClassObserver> = Box::new(NullAttributeClassObserver::new());
        assert_eq!(obs.deep_size(), size_of::<Box<dyn AttributeClassObserver>>());
    }
}
