use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::evaluation::{LearningCurve, PerformanceEvaluator, Snapshot};
use crate::streams::Stream;
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use cpu_time::ThreadTime;
use tracing::info;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Test-then-train loop: every instance is first scored, then learned.
pub struct PrequentialEvaluator {
    learner: Box<dyn Classifier>,
    stream: Box<dyn Stream>,
    evaluator: Box<dyn PerformanceEvaluator>,

    curve: LearningCurve,

    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    sample_frequency: u64,
    mem_check_frequency: u64,

    processed: u64,

    start_cpu: ThreadTime,
    last_cpu_mem: ThreadTime,

    ram_hours: f64,
    progress_tx: Option<Sender<Snapshot>>,
}

impl PrequentialEvaluator {
    pub fn new(
        mut learner: Box<dyn Classifier>,
        stream: Box<dyn Stream>,
        evaluator: Box<dyn PerformanceEvaluator>,
        max_instances: Option<u64>,
        max_seconds: Option<u64>,
        sample_frequency: u64,
        mem_check_frequency: u64,
    ) -> Result<Self, Error> {
        if sample_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "sample_frequency must be > 0",
            ));
        }
        if mem_check_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "mem_check_frequency must be > 0",
            ));
        }

        let header = stream.header();
        learner.set_model_context(Arc::new(InstanceHeader::new(
            header.relation_name().to_string(),
            header.attributes.clone(),
            header.class_index(),
        )));

        let now = ThreadTime::now();
        Ok(Self {
            learner,
            stream,
            evaluator,
            curve: LearningCurve::default(),
            max_instances,
            max_seconds,
            sample_frequency,
            mem_check_frequency,
            processed: 0,
            start_cpu: now,
            last_cpu_mem: now,
            ram_hours: 0.0,
            progress_tx: None,
        })
    }

    /// Every snapshot is also sent to `tx`; a dropped receiver is ignored.
    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn run(&mut self) -> Result<(), Error> {
        info!(
            relation = self.stream.header().relation_name(),
            max_instances = ?self.max_instances,
            max_seconds = ?self.max_seconds,
            sample_frequency = self.sample_frequency,
            "prequential evaluation started"
        );

        self.start_cpu = ThreadTime::now();
        self.last_cpu_mem = self.start_cpu;

        while self.stream.has_more_instances() {
            if self.max_instances.is_some_and(|n| self.processed >= n) {
                break;
            }
            if self
                .max_seconds
                .is_some_and(|s| self.start_cpu.elapsed().as_secs() >= s)
            {
                break;
            }

            let Some(instance) = self.stream.next_instance() else {
                break;
            };
            self.processed += 1;

            let votes = self.learner.get_votes_for_instance(instance.as_ref());
            self.evaluator.add_result(instance.as_ref(), votes);
            self.learner.train_on_instance(instance.as_ref());

            if self.processed % self.mem_check_frequency == 0 {
                self.bump_ram_hours();
            }
            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        self.bump_ram_hours();
        self.push_snapshot();

        if let Some(last) = self.curve.latest() {
            info!(
                instances = last.instances_seen,
                accuracy = last.accuracy,
                kappa = last.kappa,
                cpu_seconds = last.seconds,
                "prequential evaluation finished"
            );
        }
        Ok(())
    }

    pub fn curve(&self) -> &LearningCurve {
        &self.curve
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn push_snapshot(&mut self) {
        let mut accuracy = f64::NAN;
        let mut kappa = f64::NAN;
        let mut extras = BTreeMap::new();

        for m in self.evaluator.performance() {
            match m.name.as_str() {
                "accuracy" => accuracy = m.value,
                "kappa" => kappa = m.value,
                _ => {
                    extras.insert(m.name, m.value);
                }
            }
        }

        let snapshot = Snapshot {
            instances_seen: self.processed,
            accuracy,
            kappa,
            ram_hours: self.ram_hours,
            seconds: self.start_cpu.elapsed().as_secs_f64(),
            extras,
        };

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot.clone());
        }
        self.curve.push(snapshot);
    }

    /// Model size (GB) integrated over CPU hours since the last check.
    fn bump_ram_hours(&mut self) {
        let dt_h = self.last_cpu_mem.elapsed().as_secs_f64() / 3600.0;
        self.last_cpu_mem = ThreadTime::now();

        let model_gb = self.learner.calc_memory_size() as f64 / BYTES_PER_GB;
        self.ram_hours += model_gb * dt_h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::GaussianHellingerTree;
    use crate::evaluation::ImbalancedClassificationEvaluator;
    use crate::streams::generators::ImbalancedGaussianGenerator;
    use crate::testing::{OracleClassifier, SilentClassifier, TrainSpyClassifier, VecStream};
    use std::sync::mpsc;

    fn alternating(n: usize) -> Box<dyn Stream> {
        Box::new(VecStream::from_labels((0..n).map(|i| i % 2).collect()))
    }

    fn evaluator() -> Box<dyn PerformanceEvaluator> {
        Box::new(ImbalancedClassificationEvaluator::new())
    }

    fn oracle() -> Box<dyn Classifier> {
        Box::new(OracleClassifier::default())
    }

    #[test]
    fn test_ctor_rejects_zero_frequencies() {
        let err = PrequentialEvaluator::new(oracle(), alternating(10), evaluator(), None, None, 0, 5)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = PrequentialEvaluator::new(oracle(), alternating(10), evaluator(), None, None, 5, 0)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_periodic_and_final_snapshots() {
        let mut pq =
            PrequentialEvaluator::new(oracle(), alternating(100), evaluator(), None, None, 10, 7)
                .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 11);
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 100);
        assert!(last.accuracy > 0.9999);
        assert!(last.kappa > 0.99);
        assert!(last.ram_hours >= 0.0);
        assert_eq!(last.extras.get("g_mean"), Some(&1.0));
        assert!(last.extras.contains_key("specificity"));
    }

    #[test]
    fn test_stops_at_max_instances() {
        let mut pq =
            PrequentialEvaluator::new(oracle(), alternating(1000), evaluator(), Some(25), None, 5, 3)
                .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.processed(), 25);
        assert_eq!(pq.curve().len(), 6);
        assert_eq!(pq.curve().latest().unwrap().instances_seen, 25);
    }

    #[test]
    fn test_zero_seconds_stops_immediately() {
        let mut pq =
            PrequentialEvaluator::new(oracle(), alternating(100), evaluator(), None, Some(0), 10, 10)
                .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 1);
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 0);
        assert!(last.accuracy.is_nan());
        assert_eq!(last.kappa, 0.0);
    }

    #[test]
    fn test_empty_votes_leave_metrics_undefined() {
        let l: Box<dyn Classifier> = Box::new(SilentClassifier);
        let mut pq =
            PrequentialEvaluator::new(l, alternating(20), evaluator(), None, None, 10, 2).unwrap();
        pq.run().unwrap();

        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 20);
        assert!(last.accuracy.is_nan());
        assert_eq!(last.kappa, 0.0);
    }

    #[test]
    fn test_trains_once_per_instance() {
        let (spy, handle) = TrainSpyClassifier::new();
        let mut pq =
            PrequentialEvaluator::new(Box::new(spy), alternating(37), evaluator(), None, None, 10, 4)
                .unwrap();
        pq.run().unwrap();
        assert_eq!(handle.count(), 37);
    }

    #[test]
    fn test_progress_channel_receives_every_snapshot() {
        let (tx, rx) = mpsc::channel();
        let mut pq =
            PrequentialEvaluator::new(oracle(), alternating(30), evaluator(), None, None, 10, 10)
                .unwrap()
                .with_progress(tx);
        pq.run().unwrap();
        drop(pq);

        let seen: Vec<u64> = rx.iter().map(|s| s.instances_seen).collect();
        assert_eq!(seen, vec![10, 20, 30, 30]);
    }

    #[test]
    fn test_drives_tree_over_generated_stream() {
        let stream = ImbalancedGaussianGenerator::new(1, 0.1, 6.0, Some(3_000), 3).unwrap();
        let tree = GaussianHellingerTree::default();
        let mut pq = PrequentialEvaluator::new(
            Box::new(tree),
            Box::new(stream),
            evaluator(),
            None,
            None,
            1_000,
            1_000,
        )
        .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 4);
        let last = pq.curve().latest().unwrap();
        assert_eq!(last.instances_seen, 3_000);
        assert!(last.accuracy > 0.5, "accuracy={}", last.accuracy);
        assert!(last.ram_hours >= 0.0);
    }
}
