use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use crate::testing::dummies::header_numeric_binary;
use std::io::Error;
use std::sync::Arc;

/// Finite stream of `(feature, label)` pairs over a one-feature header with
/// the class at slot 0.
pub struct VecStream {
    header: Arc<InstanceHeader>,
    rows: Vec<(f64, f64)>,
    idx: usize,
}

impl VecStream {
    pub fn new(rows: Vec<(f64, f64)>) -> Self {
        Self {
            header: header_numeric_binary(1),
            rows,
            idx: 0,
        }
    }

    /// Rows whose single feature equals the label.
    pub fn from_labels(labels: Vec<usize>) -> Self {
        Self::new(labels.into_iter().map(|y| (y as f64, y as f64)).collect())
    }
}

impl Stream for VecStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.idx < self.rows.len()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let &(feature, label) = self.rows.get(self.idx)?;
        self.idx += 1;
        Some(Box::new(DenseInstance::from_features(
            Arc::clone(&self.header),
            &[feature],
            label,
            1.0,
        )))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }
}
