mod evaluators;
mod measurement;
mod preview;

pub use evaluators::{ImbalancedClassificationEvaluator, PerformanceEvaluator, PerformanceEvaluatorExt};
pub use measurement::Measurement;
pub use preview::learning_curve::{CurveFormat, LearningCurve};
pub use preview::snapshot::Snapshot;
