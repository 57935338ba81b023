use crate::classifiers::hoeffding_tree::instance_conditional_test::InstanceConditionalTest;
use crate::classifiers::hoeffding_tree::nodes::NodeId;
use crate::core::instances::Instance;
use crate::utils::growable::GrowableVec;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::mem::size_of;

/// Decision node payload: the test and one child slot per branch.
pub struct SplitNode {
    split_test: Box<dyn InstanceConditionalTest>,
    children: GrowableVec<Option<NodeId>>,
}

impl SplitNode {
    pub fn new(split_test: Box<dyn InstanceConditionalTest>) -> Self {
        let children = GrowableVec::with_len(split_test.max_branches());
        Self {
            split_test,
            children,
        }
    }

    pub fn split_test(&self) -> &dyn InstanceConditionalTest {
        self.split_test.as_ref()
    }

    /// # Panics
    ///
    /// When `index` is not a branch of the split test.
    pub fn set_child(&mut self, index: usize, child: NodeId) {
        assert!(
            index < self.split_test.max_branches(),
            "child index {index} exceeds the {} branches of the split test",
            self.split_test.max_branches()
        );
        self.children.set(index, Some(child));
    }

    pub fn get_child(&self, index: usize) -> Option<NodeId> {
        self.children.get_some(index).copied()
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|id| (i, id)))
    }

    pub fn instance_child_index(&self, instance: &dyn Instance) -> Option<usize> {
        self.split_test.branch_for_instance(instance)
    }
}

impl MemorySized for SplitNode {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.split_test) + meter.measure_field(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::hoeffding_tree::instance_conditional_test::NumericAttributeBinaryTest;
    use crate::classifiers::hoeffding_tree::nodes::{Node, NodeArena};
    use crate::utils::growable::GrowableVec;

    fn split() -> SplitNode {
        SplitNode::new(Box::new(NumericAttributeBinaryTest::new(0, 1.0, true)))
    }

    #[test]
    fn test_children_sized_to_branches() {
        let s = split();
        assert_eq!(s.num_children(), 2);
        assert!(s.get_child(0).is_none());
        assert!(s.get_child(1).is_none());
        assert_eq!(s.children().count(), 0);
    }

    #[test]
    fn test_set_and_get_child() {
        let mut arena = NodeArena::new();
        let leaf = arena.alloc(Node::new_active_leaf(GrowableVec::new()));
        let mut s = split();
        s.set_child(1, leaf);
        assert_eq!(s.get_child(1), Some(leaf));
        assert!(s.get_child(0).is_none());
        assert!(s.get_child(9).is_none());
        assert_eq!(s.children().collect::<Vec<_>>(), vec![(1, leaf)]);
    }

    #[test]
    #[should_panic(expected = "exceeds the 2 branches")]
    fn test_set_child_beyond_branches_panics() {
        let mut arena = NodeArena::new();
        let leaf = arena.alloc(Node::new_active_leaf(GrowableVec::new()));
        let mut s = split();
        s.set_child(2, leaf);
    }
}
