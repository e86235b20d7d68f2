use crate::core::attributes::Attribute;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::sync::Arc;

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

    /// Owned copy of any instance, sharing its header.
    pub fn from_instance(header: Arc<InstanceHeader>, instance: &dyn Instance) -> DenseInstance {
        DenseInstance::new(header, instance.to_vec(), instance.weight())
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.header.attribute_at_index(index)
    }

    fn index_of_attribute(&self, attribute: &dyn Attribute) -> Option<usize> {
        self.header.index_of_attribute(&attribute.name())
    }

    fn number_of_attributes(&self) -> usize {
        self.values.len()
    }

    fn class_index(&self) -> usize {
        self.header.class_index()
    }

    fn class_value(&self) -> Option<f64> {
        self.values
            .get(self.header.class_index())
            .copied()
            .filter(|v| !v.is_nan())
    }

    fn is_class_missing(&self) -> bool {
        self.class_value().is_none()
    }

    fn number_of_classes(&self) -> usize {
        self.header.number_of_classes()
    }

    fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    fn header(&self) -> &InstanceHeader {
        &self.header
    }
}

impl MemorySized for DenseInstance {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.header) + meter.measure_field(&self.values)
    }
}
