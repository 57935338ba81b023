use crate::core::attributes::{Attribute, NominalAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::instance::Instance;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

/// Instance holding every attribute value, class included, in one vector.
#[derive(Clone, Debug)]
pub struct DenseInstance {
    pub header: Arc<InstanceHeader>,
    pub values: Vec<f64>,
    pub weight: f64,
}

impl DenseInstance {
    pub fn new(header: Arc<InstanceHeader>, values: Vec<f64>, weight: f64) -> DenseInstance {
        DenseInstance {
            header,
            values,
            weight,
        }
    }

    /// Places `label` at the header's class slot and the features around it.
    pub fn from_features(
        header: Arc<InstanceHeader>,
        features: &[f64],
        label: f64,
        weight: f64,
    ) -> DenseInstance {
        let class_index = header.class_index().min(features.len());
        let mut values = Vec::with_capacity(features.len() + 1);
        values.extend_from_slice(&features[..class_index]);
        values.push(label);
        values.extend_from_slice(&features[class_index..]);
        DenseInstance::new(header, values, weight)
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    fn is_missing_at_index(&self, index: usize) -> Result<bool, Error> {
        self.values
            .get(index)
            .map(|v| v.is_nan())
            .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "Index out of bounds"))
    }

    fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.header.attribute_at_index(index)
    }

    fn number_of_attributes(&self) -> usize {
        self.values.len()
    }

    fn class_index(&self) -> usize {
        self.header.class_index()
    }

    fn class_value(&self) -> Option<f64> {
        self.values.get(self.header.class_index()).copied()
    }

    fn is_class_missing(&self) -> bool {
        self.class_value().is_none_or(f64::is_nan)
    }

    fn number_of_classes(&self) -> usize {
        self.header
            .class_attribute()
            .and_then(|attr| attr.as_any().downcast_ref::<NominalAttribute>())
            .map_or(0, |nominal| nominal.values.len())
    }

    fn header(&self) -> &InstanceHeader {
        &self.header
    }
}
