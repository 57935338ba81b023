mod headers;
mod silent_classifier;

pub use headers::{header_binary, header_numeric_binary};
pub use silent_classifier::SilentClassifier;
