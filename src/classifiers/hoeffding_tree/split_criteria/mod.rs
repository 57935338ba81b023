mod hellinger_split_criterion;
mod split_criterion;

pub use hellinger_split_criterion::{DEFAULT_MIN_BRANCH_FRACTION, HellingerSplitCriterion};
pub use split_criterion::SplitCriterion;
