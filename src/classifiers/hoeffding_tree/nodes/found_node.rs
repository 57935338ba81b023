use crate::classifiers::hoeffding_tree::nodes::NodeId;

/// Result of routing an instance down the tree.
///
/// `node` is `None` when routing reached an empty child slot; `parent` and
/// `parent_branch` then name the slot to fill. A root has neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoundNode {
    node: Option<NodeId>,
    parent: Option<NodeId>,
    parent_branch: Option<usize>,
}

impl FoundNode {
    pub fn new(node: Option<NodeId>, parent: Option<NodeId>, parent_branch: Option<usize>) -> Self {
        Self {
            node,
            parent,
            parent_branch,
        }
    }

    pub fn get_node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn get_parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn get_parent_branch(&self) -> Option<usize> {
        self.parent_branch
    }
}
