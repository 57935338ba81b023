pub mod arff;
pub mod generators;
pub mod stream;
mod summary;

pub use stream::Stream;
pub use summary::{StreamSummary, summarize_stream};
