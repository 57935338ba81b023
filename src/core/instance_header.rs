use crate::core::attributes::{Attribute, AttributeRef, NominalAttribute};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::fmt;

pub struct InstanceHeader {
    relation_name: String,
    pub attributes: Vec<AttributeRef>,
    class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    /// Header whose class is the last declared attribute.
    pub fn with_last_class(relation_name: String, attributes: Vec<AttributeRef>) -> InstanceHeader {
        let class_index = attributes.len().saturating_sub(1);
        Self::new(relation_name, attributes, class_index)
    }

    pub fn class_attribute(&self) -> Option<&dyn Attribute> {
        self.attribute_at_index(self.class_index)
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// Attributes other than the class.
    pub fn number_of_features(&self) -> usize {
        self.attributes.len().saturating_sub(1)
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.attributes.get(index).map(|a| a.as_ref() as &dyn Attribute)
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn number_of_classes(&self) -> usize {
        self.attributes
            .get(self.class_index)
            .and_then(|attr| attr.as_any().downcast_ref::<NominalAttribute>())
            .map_or(0, |nominal| nominal.values.len())
    }

    /// Position of a class label as declared by the nominal class attribute.
    pub fn class_label_index(&self, label: &str) -> Option<usize> {
        self.attributes
            .get(self.class_index)
            .and_then(|attr| attr.as_any().downcast_ref::<NominalAttribute>())
            .and_then(|nominal| nominal.index_of_value(label))
    }
}

impl MemorySized for InstanceHeader {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = meter.measure_field(&self.relation_name);
        total += meter.measure_field(&self.attributes);
        total
    }
}

impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("class_index", &self.class_index)
            .field("n_attributes", &self.attributes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::NumericAttribute;
    use std::sync::Arc;

    fn header() -> InstanceHeader {
        let attributes: Vec<AttributeRef> = vec![
            Arc::new(NumericAttribute::new("x".into())),
            Arc::new(NumericAttribute::new("y".into())),
            Arc::new(NominalAttribute::from_labels(
                "class".into(),
                vec!["neg".into(), "pos".into()],
            )),
        ];
        InstanceHeader::with_last_class("rel".into(), attributes)
    }

    #[test]
    fn test_with_last_class_points_at_last_attribute() {
        let h = header();
        assert_eq!(h.class_index(), 2);
        assert_eq!(h.number_of_attributes(), 3);
        assert_eq!(h.number_of_features(), 2);
        assert_eq!(h.number_of_classes(), 2);
        assert_eq!(h.class_attribute().map(|a| a.name()), Some("class".into()));
    }

    #[test]
    fn test_lookup_by_name_and_label() {
        let h = header();
        assert_eq!(h.index_of_attribute("y"), Some(1));
        assert_eq!(h.index_of_attribute("z"), None);
        assert_eq!(h.class_label_index("pos"), Some(1));
        assert_eq!(h.class_label_index("maybe"), None);
    }

    #[test]
    fn test_numeric_class_has_no_classes() {
        let attributes: Vec<AttributeRef> = vec![Arc::new(NumericAttribute::new("t".into()))];
        let h = InstanceHeader::new("r".into(), attributes, 0);
        assert_eq!(h.number_of_classes(), 0);
        assert!(h.attribute_at_index(3).is_none());
    }

    #[test]
    fn test_memory_size_covers_attribute_names() {
        let h = header();
        assert!(MemoryMeter::measure_root(&h) > size_of::<InstanceHeader>());
    }
}
