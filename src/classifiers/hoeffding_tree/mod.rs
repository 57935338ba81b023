mod gaussian_hellinger_tree;
pub mod instance_conditional_test;
pub mod nodes;
pub mod split_criteria;
mod tree_config;

pub use gaussian_hellinger_tree::{GaussianHellingerTree, ObserverFactory, TreeStats};
pub use tree_config::{ConfigError, NumericObserverKind, TreeConfig};
