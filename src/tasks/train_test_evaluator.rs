use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::streams::Stream;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

/// Counts and wall-clock time of one pass over a stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseReport {
    pub instances: u64,
    pub correct: u64,
    pub elapsed: Duration,
}

impl PhaseReport {
    /// Percentage of instances classified correctly, NaN for an empty phase.
    pub fn accuracy_percent(&self) -> f64 {
        if self.instances == 0 {
            return f64::NAN;
        }
        100.0 * self.correct as f64 / self.instances as f64
    }
}

impl fmt::Display for PhaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} instances, {} correct ({}% accuracy), completed in {} (ns) or {} (s)",
            self.instances,
            self.correct,
            self.accuracy_percent(),
            self.elapsed.as_nanos(),
            self.elapsed.as_secs_f64()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainTestReport {
    pub training: PhaseReport,
    pub testing: PhaseReport,
}

/// Trains on one stream, then scores a second one.
///
/// Both phases check `correctly_classifies` before learning an instance.
/// The test phase keeps training unless disabled, so labelled test rows
/// still refine the model.
pub struct TrainTestEvaluator<C: Classifier> {
    learner: C,
    train: Box<dyn Stream>,
    test: Box<dyn Stream>,
    train_on_test: bool,
}

impl<C: Classifier> TrainTestEvaluator<C> {
    pub fn new(mut learner: C, train: Box<dyn Stream>, test: Box<dyn Stream>) -> Self {
        let header = train.header();
        learner.set_model_context(Arc::new(InstanceHeader::new(
            header.relation_name().to_string(),
            header.attributes.clone(),
            header.class_index(),
        )));
        Self {
            learner,
            train,
            test,
            train_on_test: true,
        }
    }

    pub fn with_train_on_test(mut self, train_on_test: bool) -> Self {
        self.train_on_test = train_on_test;
        self
    }

    pub fn learner(&self) -> &C {
        &self.learner
    }

    pub fn into_learner(self) -> C {
        self.learner
    }

    pub fn run(&mut self) -> TrainTestReport {
        info!(
            train = self.train.header().relation_name(),
            test = self.test.header().relation_name(),
            train_on_test = self.train_on_test,
            "train/test evaluation started"
        );

        let training = run_phase(&mut self.learner, self.train.as_mut(), true);
        info!(
            instances = training.instances,
            accuracy = training.accuracy_percent(),
            "training phase finished"
        );

        let testing = run_phase(&mut self.learner, self.test.as_mut(), self.train_on_test);
        info!(
            instances = testing.instances,
            accuracy = testing.accuracy_percent(),
            "testing phase finished"
        );

        TrainTestReport { training, testing }
    }
}

fn run_phase<C: Classifier>(learner: &mut C, stream: &mut dyn Stream, train: bool) -> PhaseReport {
    let start = Instant::now();
    let mut instances = 0;
    let mut correct = 0;

    while let Some(inst) = stream.next_instance() {
        if learner.correctly_classifies(inst.as_ref()) {
            correct += 1;
        }
        if train {
            learner.train_on_instance(inst.as_ref());
        }
        instances += 1;
    }

    PhaseReport {
        instances,
        correct,
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::GaussianHellingerTree;
    use crate::testing::{OracleClassifier, SilentClassifier, TrainSpyClassifier, VecStream};

    const EPS: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn labels(n: usize) -> Box<dyn Stream> {
        Box::new(VecStream::from_labels((0..n).map(|i| i % 2).collect()))
    }

    #[test]
    fn test_oracle_is_always_correct() {
        let mut task = TrainTestEvaluator::new(OracleClassifier::default(), labels(10), labels(4));
        let report = task.run();
        assert_eq!(report.training.instances, 10);
        assert_eq!(report.training.correct, 10);
        assert_eq!(report.testing.instances, 4);
        assert!(approx_eq(report.testing.accuracy_percent(), 100.0));
    }

    #[test]
    fn test_empty_votes_fall_back_to_first_class() {
        let mut task = TrainTestEvaluator::new(SilentClassifier, labels(6), labels(6));
        let report = task.run();
        assert_eq!(report.training.correct, 3);
        assert!(approx_eq(report.testing.accuracy_percent(), 50.0));
    }

    #[test]
    fn test_train_on_test_switch() {
        let (spy, handle) = TrainSpyClassifier::new();
        TrainTestEvaluator::new(spy, labels(5), labels(3)).run();
        assert_eq!(handle.count(), 8);

        let (spy, handle) = TrainSpyClassifier::new();
        TrainTestEvaluator::new(spy, labels(5), labels(3))
            .with_train_on_test(false)
            .run();
        assert_eq!(handle.count(), 5);
    }

    #[test]
    fn test_empty_phase_reports_nan_accuracy() {
        let mut task = TrainTestEvaluator::new(
            OracleClassifier::default(),
            labels(3),
            Box::new(VecStream::new(Vec::new())),
        );
        let report = task.run();
        assert_eq!(report.testing.instances, 0);
        assert!(report.testing.accuracy_percent().is_nan());
    }

    #[test]
    fn test_unlabelled_rows_count_but_never_match() {
        let test = VecStream::new(vec![(0.0, f64::NAN), (1.0, 1.0)]);
        let mut task =
            TrainTestEvaluator::new(OracleClassifier::default(), labels(2), Box::new(test));
        let report = task.run();
        assert_eq!(report.testing.instances, 2);
        assert_eq!(report.testing.correct, 1);
        assert!(approx_eq(report.testing.accuracy_percent(), 50.0));
    }

    #[test]
    fn test_tree_learns_separable_rows() {
        let rows = |n: usize| -> Box<dyn Stream> {
            Box::new(VecStream::new(
                (0..n)
                    .map(|i| if i % 3 == 0 { (9.0, 1.0) } else { (1.0, 0.0) })
                    .collect(),
            ))
        };
        let config = crate::classifiers::TreeConfig {
            grace_period: 30,
            ..Default::default()
        };
        let tree = GaussianHellingerTree::new(config).unwrap();
        let mut task = TrainTestEvaluator::new(tree, rows(300), rows(90)).with_train_on_test(false);
        let report = task.run();

        assert!(report.testing.accuracy_percent() > 99.0);
        let stats = task.learner().stats();
        assert_eq!(stats.decision_nodes, 1);
        assert_eq!(task.into_learner().decision_node_count(), 1);
    }

    #[test]
    fn test_report_display() {
        let report = PhaseReport {
            instances: 4,
            correct: 3,
            elapsed: Duration::from_nanos(1_500_000_000),
        };
        assert_eq!(
            report.to_string(),
            "4 instances, 3 correct (75% accuracy), completed in 1500000000 (ns) or 1.5 (s)"
        );
    }
}
