use crate::streams::Stream;
use std::collections::BTreeMap;
use std::fmt;

/// Example and class counts gathered by draining a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub relation: String,
    pub examples: u64,
    pub features: usize,
    /// Keyed by signed label so missing (-1) and unparseable (-2) rows show up.
    pub label_counts: BTreeMap<i64, u64>,
}

impl StreamSummary {
    /// Examples with a usable label (non-negative).
    pub fn labelled(&self) -> u64 {
        self.label_counts
            .iter()
            .filter(|(label, _)| **label >= 0)
            .map(|(_, n)| n)
            .sum()
    }

    /// Share of the labelled examples carrying `label`, `None` when nothing
    /// is labelled.
    pub fn class_share(&self, label: i64) -> Option<f64> {
        let labelled = self.labelled();
        if labelled == 0 {
            return None;
        }
        let n = self.label_counts.get(&label).copied().unwrap_or(0);
        Some(n as f64 / labelled as f64)
    }
}

impl fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "relation: {}", self.relation)?;
        writeln!(f, "examples: {}", self.examples)?;
        writeln!(f, "features: {}", self.features)?;
        for (label, n) in &self.label_counts {
            match self.class_share(*label).filter(|_| *label >= 0) {
                Some(share) => writeln!(f, "label {label}: {n} ({:.2}%)", share * 100.0)?,
                None => writeln!(f, "label {label}: {n}")?,
            }
        }
        Ok(())
    }
}

/// Consumes the stream from its current position to the end.
pub fn summarize_stream(stream: &mut dyn Stream) -> StreamSummary {
    let header = stream.header();
    let mut summary = StreamSummary {
        relation: header.relation_name().to_string(),
        examples: 0,
        features: header.number_of_features(),
        label_counts: BTreeMap::new(),
    };

    while let Some(inst) = stream.next_instance() {
        summary.examples += 1;
        *summary.label_counts.entry(inst.class_label()).or_insert(0) += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::VecStream;

    #[test]
    fn test_counts_labels() {
        let mut stream = VecStream::from_labels(vec![0, 0, 1, 0, 1, 0]);
        let s = summarize_stream(&mut stream);
        assert_eq!(s.relation, "numeric-bin");
        assert_eq!(s.examples, 6);
        assert_eq!(s.features, 1);
        assert_eq!(s.label_counts.get(&0), Some(&4));
        assert_eq!(s.label_counts.get(&1), Some(&2));
        assert_eq!(s.class_share(1), Some(2.0 / 6.0));
        assert!(!stream.has_more_instances());
    }

    #[test]
    fn test_missing_labels_are_counted_separately() {
        let mut stream = VecStream::new(vec![(0.0, 1.0), (0.0, f64::NAN), (0.0, 0.0)]);
        let s = summarize_stream(&mut stream);
        assert_eq!(s.examples, 3);
        assert_eq!(s.labelled(), 2);
        assert_eq!(s.label_counts.get(&-1), Some(&1));
        assert_eq!(s.class_share(1), Some(0.5));

        let text = s.to_string();
        assert!(text.contains("label -1: 1\n"));
        assert!(text.contains("label 1: 1 (50.00%)"));
    }

    #[test]
    fn test_empty_stream() {
        let mut stream = VecStream::new(Vec::new());
        let s = summarize_stream(&mut stream);
        assert_eq!(s.examples, 0);
        assert!(s.label_counts.is_empty());
        assert_eq!(s.class_share(0), None);
    }
}
