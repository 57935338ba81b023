use crate::core::attributes::Attribute;
use crate::core::instance_header::InstanceHeader;
use std::io::Error;

/// Label reported when the class value is absent.
pub const MISSING_CLASS_LABEL: i64 = -1;
/// Label used by readers for class tokens that could not be parsed.
pub const UNPARSEABLE_CLASS_LABEL: i64 = -2;

pub trait Instance {
    fn weight(&self) -> f64;

    fn value_at_index(&self, index: usize) -> Option<f64>;

    fn is_missing_at_index(&self, index: usize) -> Result<bool, Error>;

    fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute>;

    fn number_of_attributes(&self) -> usize;

    fn class_index(&self) -> usize;

    fn class_value(&self) -> Option<f64>;

    fn is_class_missing(&self) -> bool;

    fn number_of_classes(&self) -> usize;

    fn header(&self) -> &InstanceHeader;

    /// Signed class label; non-finite or absent class values map to
    /// [`MISSING_CLASS_LABEL`].
    fn class_label(&self) -> i64 {
        match self.class_value() {
            Some(v) if v.is_finite() => v as i64,
            _ => MISSING_CLASS_LABEL,
        }
    }

    fn is_trainable(&self) -> bool {
        self.weight() > 0.0 && !self.is_class_missing() && self.class_label() >= 0
    }
}
