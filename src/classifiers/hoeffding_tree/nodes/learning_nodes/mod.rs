mod active_learning_node;

pub use active_learning_node::ActiveLearningNode;
