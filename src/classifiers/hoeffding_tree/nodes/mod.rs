mod found_node;
mod learning_nodes;
mod node;
mod node_arena;
mod split_node;

pub use found_node::FoundNode;
pub use learning_nodes::ActiveLearningNode;
pub use node::{LeafState, Node, NodeKind};
pub use node_arena::{NodeArena, NodeId};
pub use split_node::SplitNode;
