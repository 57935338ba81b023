mod attribute_class_observer;
mod gaussian_numeric_attribute_class_observer;
mod null_attribute_class_observer;

pub use attribute_class_observer::AttributeClassObserver;
pub use gaussian_numeric_attribute_class_observer::{
    DEFAULT_NUM_BINS, GaussianNumericAttributeClassObserver,
};
pub use null_attribute_class_observer::NullAttributeClassObserver;
