use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;

/// Votes for the instance's own label, so it is always right.
#[derive(Default)]
pub struct OracleClassifier {
    num_classes: usize,
}

impl Classifier for OracleClassifier {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let mut votes = vec![0.0; self.num_classes.max(2)];
        if let Ok(label) = usize::try_from(instance.class_label()) {
            if label < votes.len() {
                votes[label] = 1.0;
            }
        }
        votes
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        self.num_classes = header.number_of_classes();
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) {}

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>()
    }
}
