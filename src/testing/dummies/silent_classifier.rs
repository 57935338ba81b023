use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::sync::Arc;

/// Never votes; stands in for an untrained model.
#[derive(Default)]
pub struct SilentClassifier;

impl Classifier for SilentClassifier {
    fn get_votes_for_instance(&self, _instance: &dyn Instance) -> Vec<f64> {
        Vec::new()
    }

    fn set_model_context(&mut self, _header: Arc<InstanceHeader>) {}

    fn train_on_instance(&mut self, _instance: &dyn Instance) {}

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>()
    }
}
