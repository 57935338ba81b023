pub mod attribute_class_observers;
pub mod classifier;
pub mod conditional_tests;
pub mod hoeffding_tree;

pub use classifier::Classifier;
pub use hoeffding_tree::{GaussianHellingerTree, TreeConfig, TreeStats};
