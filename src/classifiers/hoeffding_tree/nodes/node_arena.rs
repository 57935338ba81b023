use crate::classifiers::hoeffding_tree::nodes::{FoundNode, Node};
use crate::core::instances::Instance;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::mem;

/// Handle to a node stored in a [`NodeArena`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl MemorySized for NodeId {}

/// Owns every node of a tree.
///
/// Slots are never freed: a node changing kind (split, deactivation) is
/// overwritten in place so its handle, and the parent slot pointing at it,
/// stay valid.
#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Installs `node` at `id` and hands back the previous occupant.
    pub fn replace(&mut self, id: NodeId, node: Node) -> Node {
        mem::replace(&mut self.nodes[id.0], node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Walks from `root` down to the node responsible for `instance`.
    ///
    /// Stops at a leaf, at a decision node whose branch is unknown for the
    /// instance, or just before an empty child slot.
    pub fn filter_instance_to_leaf(&self, root: NodeId, instance: &dyn Instance) -> FoundNode {
        let mut current = root;
        let mut parent = None;
        let mut parent_branch = None;

        loop {
            let Some(split) = self.get(current).as_split() else {
                return FoundNode::new(Some(current), parent, parent_branch);
            };
            let Some(branch) = split.instance_child_index(instance) else {
                return FoundNode::new(Some(current), parent, parent_branch);
            };
            match split.get_child(branch) {
                Some(child) => {
                    parent = Some(current);
                    parent_branch = Some(branch);
                    current = child;
                }
                None => return FoundNode::new(None, Some(current), Some(branch)),
            }
        }
    }
}

impl MemorySized for NodeArena {
    fn inline_size(&self) -> usize {
        mem::size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.nodes)
    }
}
