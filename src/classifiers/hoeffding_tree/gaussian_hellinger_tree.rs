use crate::classifiers::Classifier;
use crate::classifiers::attribute_class_observers::{
    AttributeClassObserver, GaussianNumericAttributeClassObserver, NullAttributeClassObserver,
};
use crate::classifiers::hoeffding_tree::instance_conditional_test::InstanceConditionalTest;
use crate::classifiers::hoeffding_tree::nodes::{FoundNode, Node, NodeArena, NodeId, SplitNode};
use crate::classifiers::hoeffding_tree::split_criteria::{HellingerSplitCriterion, SplitCriterion};
use crate::classifiers::hoeffding_tree::{ConfigError, NumericObserverKind, TreeConfig};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::utils::growable::GrowableVec;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::cmp::Ordering;
use std::fmt;
use std::mem::size_of;
use std::sync::Arc;
use tracing::{debug, trace};

/// Builds the observer a leaf attaches to a numeric feature on first touch.
pub type ObserverFactory = Box<dyn Fn() -> Box<dyn AttributeClassObserver>>;

/// Stand-in for a zero split confidence so the bound stays finite.
const MIN_SPLIT_CONFIDENCE: f64 = 0.0000001;

/// Point-in-time shape of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub decision_nodes: usize,
    pub active_leaves: usize,
    pub inactive_leaves: usize,
    pub depth: usize,
    pub byte_size: usize,
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "decision nodes: {}, active leaves: {}, inactive leaves: {}, depth: {}, bytes: {}",
            self.decision_nodes, self.active_leaves, self.inactive_leaves, self.depth, self.byte_size
        )
    }
}

/// Hoeffding tree for imbalanced binary streams.
///
/// Leaves summarise each feature with one Gaussian per class and split on
/// the feature whose class-conditional Gaussians are furthest apart in
/// Hellinger distance.
pub struct GaussianHellingerTree {
    arena: NodeArena,
    tree_root: Option<NodeId>,
    decision_node_count: usize,
    active_leaf_node_count: usize,
    inactive_leaf_node_count: usize,
    growth_allowed: bool,
    header: Option<Arc<InstanceHeader>>,
    config: TreeConfig,
    split_criterion: HellingerSplitCriterion,
    numeric_observer_factory: ObserverFactory,
    active_leaf_byte_size_estimate: f64,
    inactive_leaf_byte_size_estimate: f64,
    byte_size_estimate_overhead_fraction: f64,
}

impl fmt::Debug for GaussianHellingerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GaussianHellingerTree")
            .field("config", &self.config)
            .field("root", &self.tree_root)
            .field("decision_nodes", &self.decision_node_count)
            .field("active_leaves", &self.active_leaf_node_count)
            .field("inactive_leaves", &self.inactive_leaf_node_count)
            .field("growth_allowed", &self.growth_allowed)
            .finish_non_exhaustive()
    }
}

impl Default for GaussianHellingerTree {
    fn default() -> Self {
        Self::from_valid_config(TreeConfig::default())
    }
}

impl GaussianHellingerTree {
    pub fn new(config: TreeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: TreeConfig) -> Self {
        Self {
            arena: NodeArena::new(),
            tree_root: None,
            decision_node_count: 0,
            active_leaf_node_count: 0,
            inactive_leaf_node_count: 0,
            growth_allowed: true,
            header: None,
            split_criterion: HellingerSplitCriterion::with_min_branch_fraction(
                config.min_branch_fraction,
            ),
            numeric_observer_factory: Self::default_observer_factory(&config),
            config,
            active_leaf_byte_size_estimate: 0.0,
            inactive_leaf_byte_size_estimate: 0.0,
            byte_size_estimate_overhead_fraction: 1.0,
        }
    }

    fn default_observer_factory(config: &TreeConfig) -> ObserverFactory {
        match config.numeric_observer {
            NumericObserverKind::GaussianHellinger => {
                let num_bins = config.num_bins;
                Box::new(move || {
                    Box::new(GaussianNumericAttributeClassObserver::with_num_bins(num_bins))
                })
            }
            NumericObserverKind::Null => Box::new(|| Box::new(NullAttributeClassObserver::new())),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Replaces the observer factory used by leaves created or first
    /// touched from now on.
    pub fn set_numeric_observer_factory<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn AttributeClassObserver> + 'static,
    {
        self.numeric_observer_factory = Box::new(factory);
    }

    pub fn new_numeric_class_observer(&self) -> Box<dyn AttributeClassObserver> {
        (self.numeric_observer_factory)()
    }

    /// Instance slot holding model feature `index`: features after the
    /// class slot are shifted by one.
    pub fn model_attribute_index_to_instance_attribute_index(
        index: usize,
        instance: &dyn Instance,
    ) -> usize {
        let class_index = instance.class_index();
        if class_index > index {
            return index;
        }
        index + 1
    }

    pub fn compute_hoeffding_bound(range: f64, confidence: f64, n: f64) -> f64 {
        let confidence = if confidence == 0.0 {
            MIN_SPLIT_CONFIDENCE
        } else {
            confidence
        };
        (((range * range) * (1.0 / confidence).ln()) / (2.0 * n)).sqrt()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree_root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub fn decision_node_count(&self) -> usize {
        self.decision_node_count
    }

    pub fn active_leaf_node_count(&self) -> usize {
        self.active_leaf_node_count
    }

    pub fn inactive_leaf_node_count(&self) -> usize {
        self.inactive_leaf_node_count
    }

    pub fn growth_allowed(&self) -> bool {
        self.growth_allowed
    }

    pub fn set_growth_allowed(&mut self, growth_allowed: bool) {
        self.growth_allowed = growth_allowed;
    }

    pub fn model_context(&self) -> Option<&InstanceHeader> {
        self.header.as_deref()
    }

    /// Decision levels between the root and its deepest leaf.
    pub fn measure_tree_depth(&self) -> usize {
        self.tree_root.map_or(0, |root| self.subtree_depth(root))
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            decision_nodes: self.decision_node_count,
            active_leaves: self.active_leaf_node_count,
            inactive_leaves: self.inactive_leaf_node_count,
            depth: self.measure_tree_depth(),
            byte_size: self.calc_memory_size(),
        }
    }

    fn subtree_depth(&self, id: NodeId) -> usize {
        match self.arena.get(id).as_split() {
            None => 0,
            Some(split) => {
                1 + split
                    .children()
                    .map(|(_, child)| self.subtree_depth(child))
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    pub fn filter_instance_to_leaf(&self, instance: &dyn Instance) -> Option<FoundNode> {
        self.tree_root
            .map(|root| self.arena.filter_instance_to_leaf(root, instance))
    }

    pub fn calculate_promise(&self, id: NodeId) -> f64 {
        self.arena.get(id).calculate_promise()
    }

    /// Hellinger distance between the class Gaussians of every feature the
    /// leaf observes, or `None` for features without a Gaussian observer.
    pub fn feature_hellinger_distances(&self, id: NodeId) -> Vec<Option<f64>> {
        let Some(active) = self.arena.get(id).as_active() else {
            return Vec::new();
        };
        (0..active.num_attribute_observers())
            .map(|i| {
                active
                    .attribute_observer(i)
                    .and_then(|obs| {
                        obs.as_any()
                            .downcast_ref::<GaussianNumericAttributeClassObserver>()
                    })
                    .map(GaussianNumericAttributeClassObserver::feature_hellinger_distance)
            })
            .collect()
    }

    fn new_learning_node(&mut self) -> NodeId {
        self.active_leaf_node_count += 1;
        self.arena.alloc(Node::new_active_leaf(GrowableVec::new()))
    }

    fn attempt_to_split(&mut self, id: NodeId) {
        let node = self.arena.get(id);
        if node.observed_class_distribution_is_pure() {
            return;
        }
        let Some(active) = node.as_active() else {
            return;
        };

        let pre_split_dist = node.get_observed_class_distribution().to_vec();
        let weight_seen = node.get_weight_seen();
        let mut best_split_suggestions = active.get_best_split_suggestions(
            &self.split_criterion,
            &pre_split_dist,
            self.config.binary_splits,
        );
        best_split_suggestions.sort();

        let mut hoeffding_bound = None;
        let should_split = if best_split_suggestions.len() < 2 {
            !best_split_suggestions.is_empty()
        } else {
            let bound = Self::compute_hoeffding_bound(
                self.split_criterion.get_range_of_merit(&pre_split_dist),
                self.config.split_confidence,
                weight_seen,
            );
            hoeffding_bound = Some(bound);
            let n = best_split_suggestions.len();
            let best_merit = best_split_suggestions[n - 1].get_merit();
            let second_merit = best_split_suggestions[n - 2].get_merit();
            let decided = best_merit - second_merit > bound || bound < self.config.tie_threshold;
            if !decided {
                trace!(
                    node = id.index(),
                    weight_seen,
                    best_merit,
                    second_merit,
                    bound,
                    "split deferred"
                );
            }
            decided
        };

        if !should_split {
            return;
        }
        let Some(split_decision) = best_split_suggestions.pop() else {
            return;
        };
        let merit = split_decision.get_merit();
        match split_decision.into_parts() {
            (None, _) => {
                self.deactivate_learning_node(id);
            }
            (Some(split_test), resulting_dists) => {
                self.split_node(id, split_test, resulting_dists, merit, hoeffding_bound);
            }
        }
    }

    /// Turns the leaf at `id` into a decision node with one fresh active
    /// leaf per branch.
    fn split_node(
        &mut self,
        id: NodeId,
        split_test: Box<dyn InstanceConditionalTest>,
        resulting_dists: Vec<Vec<f64>>,
        merit: f64,
        bound: Option<f64>,
    ) {
        let condition = split_test.describe_condition_for_branch(0);
        let mut split = SplitNode::new(split_test);
        let num_branches = resulting_dists.len();
        for (branch, dist) in resulting_dists.into_iter().enumerate() {
            let child = self.arena.alloc(Node::new_active_leaf(GrowableVec::from(dist)));
            split.set_child(branch, child);
        }

        let pre_split_dist = self.arena.get(id).get_observed_class_distribution().clone();
        self.arena.replace(id, Node::new_decision(split, pre_split_dist));

        self.active_leaf_node_count = (self.active_leaf_node_count + num_branches).saturating_sub(1);
        self.decision_node_count += 1;
        debug!(
            node = id.index(),
            condition = %condition,
            merit,
            bound = ?bound,
            branches = num_branches,
            "split leaf"
        );
    }

    /// Freezes an active leaf; returns whether anything changed.
    pub fn deactivate_learning_node(&mut self, id: NodeId) -> bool {
        if id.index() >= self.arena.len() || !self.arena.get(id).is_active() {
            return false;
        }
        let dist = self.arena.get(id).get_observed_class_distribution().clone();
        self.arena.replace(id, Node::new_inactive_leaf(dist));
        self.active_leaf_node_count = self.active_leaf_node_count.saturating_sub(1);
        self.inactive_leaf_node_count += 1;
        debug!(node = id.index(), "deactivated leaf");
        true
    }

    /// Thaws an inactive leaf; its feature statistics start from scratch.
    pub fn activate_learning_node(&mut self, id: NodeId) -> bool {
        if id.index() >= self.arena.len() || !self.arena.get(id).is_inactive() {
            return false;
        }
        let dist = self.arena.get(id).get_observed_class_distribution().clone();
        self.arena.replace(id, Node::new_active_leaf(dist));
        self.inactive_leaf_node_count = self.inactive_leaf_node_count.saturating_sub(1);
        self.active_leaf_node_count += 1;
        debug!(node = id.index(), "activated leaf");
        true
    }

    pub fn deactivate_all_leaves(&mut self) {
        for found in self.find_learning_nodes() {
            if let Some(id) = found.get_node() {
                self.deactivate_learning_node(id);
            }
        }
    }

    /// Every leaf reachable from the root, with its parent context.
    pub fn find_learning_nodes(&self) -> Vec<FoundNode> {
        let mut found = Vec::new();
        if let Some(root) = self.tree_root {
            self.find_learning_nodes_rec(root, None, None, &mut found);
        }
        found
    }

    fn find_learning_nodes_rec(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        parent_branch: Option<usize>,
        found: &mut Vec<FoundNode>,
    ) {
        match self.arena.get(id).as_split() {
            None => found.push(FoundNode::new(Some(id), parent, parent_branch)),
            Some(split) => {
                for (branch, child) in split.children() {
                    self.find_learning_nodes_rec(child, Some(id), Some(branch), found);
                }
            }
        }
    }

    fn estimated_byte_size(&self, active: usize, inactive: usize) -> f64 {
        (active as f64 * self.active_leaf_byte_size_estimate
            + inactive as f64 * self.inactive_leaf_byte_size_estimate)
            * self.byte_size_estimate_overhead_fraction
    }

    /// Refreshes the per-leaf size estimates from the current tree.
    pub fn estimate_model_byte_sizes(&mut self) {
        let mut total_active_size = 0.0;
        let mut total_inactive_size = 0.0;
        for found in self.find_learning_nodes() {
            let Some(id) = found.get_node() else {
                continue;
            };
            let node = self.arena.get(id);
            let size = node.deep_size() as f64;
            if node.is_active() {
                total_active_size += size;
            } else {
                total_inactive_size += size;
            }
        }

        if self.active_leaf_node_count > 0 && total_active_size > 0.0 {
            self.active_leaf_byte_size_estimate =
                total_active_size / self.active_leaf_node_count as f64;
        }
        if self.inactive_leaf_node_count > 0 && total_inactive_size > 0.0 {
            self.inactive_leaf_byte_size_estimate =
                total_inactive_size / self.inactive_leaf_node_count as f64;
        }

        self.byte_size_estimate_overhead_fraction = 1.0;
        let estimated_model_size =
            self.estimated_byte_size(self.active_leaf_node_count, self.inactive_leaf_node_count);
        if estimated_model_size > 0.0 {
            self.byte_size_estimate_overhead_fraction =
                self.calc_memory_size() as f64 / estimated_model_size;
        }
    }

    /// Keeps the most promising leaves active within `max_byte_size`,
    /// deactivating the rest.
    pub fn enforce_memory_limit(&mut self, max_byte_size: usize) {
        self.estimate_model_byte_sizes();
        let memory_usage =
            self.estimated_byte_size(self.active_leaf_node_count, self.inactive_leaf_node_count);
        if self.inactive_leaf_node_count == 0 && memory_usage <= max_byte_size as f64 {
            return;
        }

        let mut learning_nodes: Vec<(NodeId, f64)> = self
            .find_learning_nodes()
            .iter()
            .filter_map(FoundNode::get_node)
            .map(|id| (id, self.calculate_promise(id)))
            .collect();
        learning_nodes.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let mut max_active = 0;
        while max_active < learning_nodes.len() {
            max_active += 1;
            let estimate =
                self.estimated_byte_size(max_active, learning_nodes.len() - max_active);
            if estimate > max_byte_size as f64 {
                max_active -= 1;
                break;
            }
        }

        let cutoff = learning_nodes.len() - max_active;
        let mut deactivated = 0;
        let mut activated = 0;
        for (i, &(id, _)) in learning_nodes.iter().enumerate() {
            if i < cutoff {
                deactivated += usize::from(self.deactivate_learning_node(id));
            } else {
                activated += usize::from(self.activate_learning_node(id));
            }
        }
        debug!(
            max_byte_size,
            max_active, deactivated, activated, "enforced memory limit"
        );
    }

    /// Drops the whole model, keeping configuration and observer factory.
    pub fn reset_learning(&mut self) {
        self.arena.clear();
        self.tree_root = None;
        self.decision_node_count = 0;
        self.active_leaf_node_count = 0;
        self.inactive_leaf_node_count = 0;
        self.growth_allowed = true;
        self.active_leaf_byte_size_estimate = 0.0;
        self.inactive_leaf_byte_size_estimate = 0.0;
        self.byte_size_estimate_overhead_fraction = 1.0;
    }
}

impl Classifier for GaussianHellingerTree {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let Some(found) = self.filter_instance_to_leaf(instance) else {
            return Vec::new();
        };
        match found.get_node().or(found.get_parent()) {
            Some(id) => self.arena.get(id).get_class_votes(),
            None => Vec::new(),
        }
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        self.header = Some(header);
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) {
        if !instance.is_trainable() {
            return;
        }

        let root = match self.tree_root {
            Some(root) => root,
            None => {
                let root = self.new_learning_node();
                self.tree_root = Some(root);
                root
            }
        };

        let found = self.arena.filter_instance_to_leaf(root, instance);
        let leaf = match found.get_node() {
            Some(id) => id,
            None => {
                let id = self.new_learning_node();
                if let (Some(parent), Some(branch)) = (found.get_parent(), found.get_parent_branch())
                {
                    if let Some(split) = self.arena.get_mut(parent).as_split_mut() {
                        split.set_child(branch, id);
                    }
                }
                id
            }
        };

        let new_observer = self.numeric_observer_factory.as_ref();
        self.arena.get_mut(leaf).learn_from_instance(instance, new_observer);

        if !self.growth_allowed {
            return;
        }
        let node = self.arena.get(leaf);
        let Some(active) = node.as_active() else {
            return;
        };
        let weight_seen = node.get_weight_seen();
        if weight_seen - active.get_weight_seen_at_last_split_evaluation()
            >= self.config.grace_period as f64
        {
            self.attempt_to_split(leaf);
            if let Some(active) = self.arena.get_mut(leaf).as_active_mut() {
                active.set_weight_seen_at_last_split_evaluation(weight_seen);
            }
        }
    }

    fn calc_memory_size(&self) -> usize {
        MemoryMeter::measure_root(self)
    }
}

impl MemorySized for GaussianHellingerTree {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = 0;
        total += meter.measure_field(&self.arena);
        total += meter.measure_field(&self.header);
        total += meter.measure_field(&self.split_criterion);
        total
    }
}
