use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use std::sync::Arc;

/// An ordered batch of instances sharing one header.
#[derive(Clone, Debug)]
pub struct Dataset {
    header: Arc<InstanceHeader>,
    instances: Vec<DenseInstance>,
}

impl Dataset {
    pub fn new(header: Arc<InstanceHeader>) -> Self {
        Self {
            header,
            instances: Vec::new(),
        }
    }

    /// Drains the remaining instances of a stream.
    pub fn from_stream(stream: &mut dyn Stream) -> Self {
        let header = stream.header_ref();
        let mut dataset = Dataset::new(header);
        while stream.has_more_instances() {
            let Some(instance) = stream.next_instance() else {
                break;
            };
            dataset.add(instance.as_ref());
        }
        dataset
    }

    pub fn header(&self) -> &InstanceHeader {
        &self.header
    }

    pub fn header_ref(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    /// Appends a row of raw values with unit weight.
    pub fn push(&mut self, values: Vec<f64>) {
        self.instances
            .push(DenseInstance::new(Arc::clone(&self.header), values, 1.0));
    }

    /// Appends a copy of `instance`, re-homed onto this dataset's header.
    pub fn add(&mut self, instance: &dyn Instance) {
        self.instances
            .push(DenseInstance::from_instance(Arc::clone(&self.header), instance));
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DenseInstance> {
        self.instances.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DenseInstance> {
        self.instances.iter()
    }
}
