pub mod attributes;
pub mod estimators;
pub mod instance_header;
pub mod instances;
