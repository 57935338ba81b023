mod dense_instance;
mod instance;

pub use dense_instance::DenseInstance;
pub use instance::{Instance, MISSING_CLASS_LABEL, UNPARSEABLE_CLASS_LABEL};
