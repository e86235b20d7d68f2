pub mod attributes;
pub mod capabilities;
pub mod instance_header;
pub mod instances;
