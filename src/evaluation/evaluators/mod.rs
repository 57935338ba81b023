mod imbalanced_classification_evaluator;
mod performance_evaluator;

pub use imbalanced_classification_evaluator::ImbalancedClassificationEvaluator;
pub use performance_evaluator::{PerformanceEvaluator, PerformanceEvaluatorExt};
