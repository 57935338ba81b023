use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct TrainSpyHandle(Arc<AtomicU64>);

impl TrainSpyHandle {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Votes for class 0 and counts how many instances it was trained on.
pub struct TrainSpyClassifier {
    count: Arc<AtomicU64>,
}

impl TrainSpyClassifier {
    pub fn new() -> (Self, TrainSpyHandle) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                count: Arc::clone(&counter),
            },
            TrainSpyHandle(counter),
        )
    }
}

impl Classifier for TrainSpyClassifier {
    fn get_votes_for_instance(&self, _instance: &dyn Instance) -> Vec<f64> {
        vec![1.0, 0.0]
    }

    fn set_model_context(&mut self, _header: Arc<InstanceHeader>) {}

    fn train_on_instance(&mut self, _instance: &dyn Instance) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>()
    }
}
