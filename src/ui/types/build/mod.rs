mod error;
mod learners;
mod streams;

pub use error::BuildError;

pub use learners::build_tree;
pub use streams::build_stream;
