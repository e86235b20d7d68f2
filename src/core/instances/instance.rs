use crate::core::attributes::Attribute;
use crate::core::instance_header::InstanceHeader;

/// A single observation. Values are `f64`; nominal values hold their category
/// code and a missing value is `NaN`.
pub trait Instance {
    fn weight(&self) -> f64;

    fn value_at_index(&self, index: usize) -> Option<f64>;

    fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute>;
    fn index_of_attribute(&self, attribute: &dyn Attribute) -> Option<usize>;
    fn number_of_attributes(&self) -> usize;

    fn class_index(&self) -> usize;
    fn class_value(&self) -> Option<f64>;
    fn is_class_missing(&self) -> bool;
    fn number_of_classes(&self) -> usize;

    fn to_vec(&self) -> Vec<f64>;
    fn header(&self) -> &InstanceHeader;
}
