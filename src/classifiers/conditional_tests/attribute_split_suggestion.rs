use crate::classifiers::hoeffding_tree::instance_conditional_test::InstanceConditionalTest;
use std::cmp::Ordering;

/// A candidate split: the test to install, the class distribution each
/// branch would start with, and its merit.
///
/// Suggestions order by merit ascending. A NaN merit sorts above every
/// number.
pub struct AttributeSplitSuggestion {
    split_test: Option<Box<dyn InstanceConditionalTest>>,
    resulting_class_distributions: Vec<Vec<f64>>,
    merit: f64,
}

impl AttributeSplitSuggestion {
    pub fn new(
        split_test: Option<Box<dyn InstanceConditionalTest>>,
        resulting_class_distributions: Vec<Vec<f64>>,
        merit: f64,
    ) -> Self {
        Self {
            split_test,
            resulting_class_distributions,
            merit,
        }
    }

    pub fn get_split_test(&self) -> Option<&dyn InstanceConditionalTest> {
        self.split_test.as_deref()
    }

    pub fn get_resulting_class_distributions(&self) -> &[Vec<f64>] {
        &self.resulting_class_distributions
    }

    pub fn get_merit(&self) -> f64 {
        self.merit
    }

    pub fn number_of_splits(&self) -> usize {
        self.resulting_class_distributions.len()
    }

    pub fn resulting_class_distribution_from_split(&self, split_index: usize) -> &[f64] {
        self.resulting_class_distributions
            .get(split_index)
            .map_or(&[], Vec::as_slice)
    }

    /// Splits the suggestion into its test and per-branch distributions.
    pub fn into_parts(self) -> (Option<Box<dyn InstanceConditionalTest>>, Vec<Vec<f64>>) {
        (self.split_test, self.resulting_class_distributions)
    }
}

impl PartialEq for AttributeSplitSuggestion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AttributeSplitSuggestion {}

impl PartialOrd for AttributeSplitSuggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributeSplitSuggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.merit.is_nan(), other.merit.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self
                .merit
                .partial_cmp(&other.merit)
                .unwrap_or(Ordering::Equal),
        }
    }
}
