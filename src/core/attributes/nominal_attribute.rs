use crate::core::attributes::Attribute;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::any::Any;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn new(name: String) -> NominalAttribute {
        NominalAttribute {
            name,
            values: Vec::new(),
            label_to_index: HashMap::new(),
        }
    }

    pub fn with_values(
        name: String,
        values: Vec<String>,
        label_to_index: HashMap<String, usize>,
    ) -> NominalAttribute {
        NominalAttribute {
            name,
            values,
            label_to_index,
        }
    }

    /// Builds the label lookup from the declared value order.
    pub fn from_labels(name: String, values: Vec<String>) -> NominalAttribute {
        let label_to_index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        Self::with_values(name, values, label_to_index)
    }

    pub fn index_of_value(&self, label: &str) -> Option<usize> {
        self.label_to_index.get(label).copied()
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

impl Attribute for NominalAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arff_representation(&self) -> String {
        format!("@attribute {} {{{}}}", self.name, self.values.join(","))
    }
}

impl MemorySized for NominalAttribute {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = meter.measure_field(&self.name);
        total += meter.measure_field(&self.values);
        total += self.label_to_index.capacity() * size_of::<(String, usize)>();
        total += self.label_to_index.keys().map(|k| k.capacity()).sum::<usize>();
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_labels_indexes_in_declaration_order() {
        let a = NominalAttribute::from_labels("class".into(), vec!["neg".into(), "pos".into()]);
        assert_eq!(a.index_of_value("neg"), Some(0));
        assert_eq!(a.index_of_value("pos"), Some(1));
        assert_eq!(a.index_of_value("other"), None);
        assert_eq!(a.value_at(1), Some("pos"));
    }

    #[test]
    fn test_arff_representation_lists_values() {
        let a = NominalAttribute::from_labels("class".into(), vec!["0".into(), "1".into()]);
        assert_eq!(a.arff_representation(), "@attribute class {0,1}");
        assert!(!a.is_numeric());
    }
}
