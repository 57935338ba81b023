use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use std::sync::Arc;

fn binary_class() -> AttributeRef {
    Arc::new(NominalAttribute::from_labels(
        "class".into(),
        vec!["0".into(), "1".into()],
    )) as AttributeRef
}

/// Header holding nothing but a binary class.
pub fn header_binary() -> Arc<InstanceHeader> {
    Arc::new(InstanceHeader::new("bin".into(), vec![binary_class()], 0))
}

/// Binary class at slot 0 followed by `num_features` numeric features.
pub fn header_numeric_binary(num_features: usize) -> Arc<InstanceHeader> {
    let mut attributes = vec![binary_class()];
    attributes.extend(
        (0..num_features)
            .map(|i| Arc::new(NumericAttribute::new(format!("f{i}"))) as AttributeRef),
    );
    Arc::new(InstanceHeader::new("numeric-bin".into(), attributes, 0))
}
