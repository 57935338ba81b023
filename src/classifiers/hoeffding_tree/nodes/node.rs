use crate::classifiers::attribute_class_observers::AttributeClassObserver;
use crate::classifiers::hoeffding_tree::nodes::{ActiveLearningNode, SplitNode};
use crate::core::instances::Instance;
use crate::utils::growable::GrowableVec;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::mem::size_of;

pub enum LeafState {
    Active(ActiveLearningNode),
    /// Frozen for memory; only the class distribution keeps growing.
    Inactive,
}

pub enum NodeKind {
    Leaf(LeafState),
    Decision(SplitNode),
}

/// A tree node: the class distribution every kind carries, plus the
/// kind-specific payload.
pub struct Node {
    observed_class_distribution: GrowableVec<f64>,
    kind: NodeKind,
}

impl Node {
    pub fn new_active_leaf(observed_class_distribution: GrowableVec<f64>) -> Self {
        let weight_seen = observed_class_distribution.sum_of_values();
        Self {
            observed_class_distribution,
            kind: NodeKind::Leaf(LeafState::Active(ActiveLearningNode::new(weight_seen))),
        }
    }

    pub fn new_inactive_leaf(observed_class_distribution: GrowableVec<f64>) -> Self {
        Self {
            observed_class_distribution,
            kind: NodeKind::Leaf(LeafState::Inactive),
        }
    }

    pub fn new_decision(split: SplitNode, observed_class_distribution: GrowableVec<f64>) -> Self {
        Self {
            observed_class_distribution,
            kind: NodeKind::Decision(split),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn get_observed_class_distribution(&self) -> &GrowableVec<f64> {
        &self.observed_class_distribution
    }

    pub fn into_observed_class_distribution(self) -> GrowableVec<f64> {
        self.observed_class_distribution
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn is_active(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(LeafState::Active(_)))
    }

    pub fn is_inactive(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(LeafState::Inactive))
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match &self.kind {
            NodeKind::Decision(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn as_split_mut(&mut self) -> Option<&mut SplitNode> {
        match &mut self.kind {
            NodeKind::Decision(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn as_active(&self) -> Option<&ActiveLearningNode> {
        match &self.kind {
            NodeKind::Leaf(LeafState::Active(active)) => Some(active),
            _ => None,
        }
    }

    pub fn as_active_mut(&mut self) -> Option<&mut ActiveLearningNode> {
        match &mut self.kind {
            NodeKind::Leaf(LeafState::Active(active)) => Some(active),
            _ => None,
        }
    }

    pub fn get_weight_seen(&self) -> f64 {
        self.observed_class_distribution.sum_of_values()
    }

    pub fn observed_class_distribution_is_pure(&self) -> bool {
        self.observed_class_distribution.num_non_zero_entries() < 2
    }

    /// Weight not belonging to the majority class.
    pub fn calculate_promise(&self) -> f64 {
        let total_seen = self.get_weight_seen();
        if total_seen > 0.0 {
            total_seen - self.observed_class_distribution.max_value()
        } else {
            0.0
        }
    }

    pub fn get_class_votes(&self) -> Vec<f64> {
        self.observed_class_distribution.to_vec()
    }

    /// Counts the instance's class at a leaf; active leaves also update
    /// their feature observers. Decision nodes ignore the call.
    pub fn learn_from_instance(
        &mut self,
        instance: &dyn Instance,
        new_observer: &dyn Fn() -> Box<dyn AttributeClassObserver>,
    ) {
        let NodeKind::Leaf(state) = &mut self.kind else {
            return;
        };
        let Ok(class_val) = usize::try_from(instance.class_label()) else {
            return;
        };
        let weight = instance.weight();
        self.observed_class_distribution
            .add_to_value(class_val, weight);
        if let LeafState::Active(active) = state {
            active.learn_from_instance(instance, class_val, weight, new_observer);
        }
    }
}

impl MemorySized for Node {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let payload = match &self.kind {
            NodeKind::Leaf(LeafState::Active(active)) => {
                active.extra_heap_size(meter)
            }
            NodeKind::Leaf(LeafState::Inactive) => 0,
            NodeKind::Decision(split) => split.extra_heap_size(meter),
        };
        meter.measure_field(&self.observed_class_distribution) + payload
    }
}
