use crate::classifiers::attribute_class_observers::AttributeClassObserver;
use crate::classifiers::conditional_tests::AttributeSplitSuggestion;
use crate::classifiers::hoeffding_tree::GaussianHellingerTree;
use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::core::instances::Instance;
use crate::utils::growable::GrowableVec;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::mem::size_of;

/// Per-feature statistics of a leaf that may still split.
pub struct ActiveLearningNode {
    weight_seen_at_last_split_evaluation: f64,
    attribute_observers: GrowableVec<Option<Box<dyn AttributeClassObserver>>>,
    is_initialized: bool,
}

impl ActiveLearningNode {
    pub fn new(weight_seen: f64) -> Self {
        Self {
            weight_seen_at_last_split_evaluation: weight_seen,
            attribute_observers: GrowableVec::new(),
            is_initialized: false,
        }
    }

    pub fn get_weight_seen_at_last_split_evaluation(&self) -> f64 {
        self.weight_seen_at_last_split_evaluation
    }

    pub fn set_weight_seen_at_last_split_evaluation(&mut self, weight: f64) {
        self.weight_seen_at_last_split_evaluation = weight;
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn attribute_observer(&self, att_index: usize) -> Option<&dyn AttributeClassObserver> {
        self.attribute_observers.get_some(att_index).map(|o| o.as_ref())
    }

    pub fn num_attribute_observers(&self) -> usize {
        self.attribute_observers.count_some()
    }

    /// Feeds every feature value of `instance` to its observer, creating
    /// observers through `new_observer` on first touch.
    pub fn learn_from_instance(
        &mut self,
        instance: &dyn Instance,
        class_val: usize,
        weight: f64,
        new_observer: &dyn Fn() -> Box<dyn AttributeClassObserver>,
    ) {
        let num_attributes = instance.number_of_attributes();
        if !self.is_initialized {
            self.attribute_observers = GrowableVec::with_len(num_attributes);
            self.is_initialized = true;
        }

        for i in 0..num_attributes.saturating_sub(1) {
            let index =
                GaussianHellingerTree::model_attribute_index_to_instance_attribute_index(i, instance);
            let Some(value) = instance.value_at_index(index) else {
                continue;
            };
            self.attribute_observers
                .slot_mut(i)
                .get_or_insert_with(|| new_observer())
                .observe_attribute_class(value, class_val, weight);
        }
    }

    pub fn get_best_split_suggestions(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_distribution: &[f64],
        binary_only: bool,
    ) -> Vec<AttributeSplitSuggestion> {
        self.attribute_observers
            .iter()
            .enumerate()
            .filter_map(|(i, obs)| {
                obs.as_ref()?.get_best_evaluated_split_suggestion(
                    criterion,
                    pre_split_distribution,
                    i,
                    binary_only,
                )
            })
            .collect()
    }
}

impl MemorySized for ActiveLearningNode {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.attribute_observers)
    }
}
