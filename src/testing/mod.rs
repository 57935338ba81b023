pub mod dummies;
pub mod spies;
pub mod stubs;

pub use dummies::{SilentClassifier, header_binary, header_numeric_binary};
pub use spies::{TrainSpyClassifier, TrainSpyHandle};
pub use stubs::{OracleClassifier, VecStream};
