use crate::core::instances::Instance;
use crate::evaluation::Measurement;
use std::collections::HashMap;

/// Online evaluator fed with labelled instances and the votes a classifier
/// produced for them.
pub trait PerformanceEvaluator {
    /// Forgets every result seen so far.
    fn reset(&mut self);

    /// Records one instance and its class votes (one score per class).
    /// Instances without a usable label, or with no votes, may be skipped.
    fn add_result(&mut self, example: &dyn Instance, class_votes: Vec<f64>);

    fn performance(&self) -> Vec<Measurement>;
}

pub trait PerformanceEvaluatorExt {
    /// `(name, value)` for each requested metric, in request order.
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>;

    fn metric(&self, name: &str) -> Option<f64> {
        self.metrics([name]).into_iter().next().and_then(|(_, v)| v)
    }
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let map: HashMap<_, _> = self
            .performance()
            .into_iter()
            .map(|m| (m.name, m.value))
            .collect();
        names
            .into_iter()
            .map(|n| (n.to_string(), map.get(n).copied()))
            .collect()
    }
}
