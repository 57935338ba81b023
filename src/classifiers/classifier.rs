use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::utils::math::max_index;
use std::sync::Arc;

pub trait Classifier {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64>;
    fn set_model_context(&mut self, header: Arc<InstanceHeader>);
    fn train_on_instance(&mut self, instance: &dyn Instance);
    fn calc_memory_size(&self) -> usize;

    /// Index of the strongest vote; the first maximum wins.
    fn classify(&self, instance: &dyn Instance) -> usize {
        max_index(&self.get_votes_for_instance(instance))
    }

    fn correctly_classifies(&self, instance: &dyn Instance) -> bool {
        let label = instance.class_label();
        label >= 0 && self.classify(instance) == label as usize
    }
}
