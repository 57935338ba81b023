mod prequential_evaluator;
mod train_test_evaluator;

pub use prequential_evaluator::PrequentialEvaluator;
pub use train_test_evaluator::{PhaseReport, TrainTestEvaluator, TrainTestReport};
