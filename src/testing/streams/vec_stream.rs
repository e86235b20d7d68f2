use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use std::io::Error;
use std::sync::Arc;

/// In-memory stream of `(x, class)` rows where `x` equals the class code.
pub struct VecStream {
    header: Arc<InstanceHeader>,
    labels: Vec<usize>,
    position: usize,
}

impl VecStream {
    pub fn new(labels: Vec<usize>) -> Self {
        let n_classes = labels.iter().copied().max().map_or(2, |m| (m + 1).max(2));
        let class_labels: Vec<String> = (0..n_classes).map(|c| c.to_string()).collect();
        let header = InstanceHeader::new(
            "vec_stream".into(),
            vec![
                Arc::new(NumericAttribute::new("x".into())) as AttributeRef,
                Arc::new(NominalAttribute::from_labels("class", class_labels)) as AttributeRef,
            ],
            1,
        );
        Self {
            header: Arc::new(header),
            labels,
            position: 0,
        }
    }
}

impl Stream for VecStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn header_ref(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    fn has_more_instances(&self) -> bool {
        self.position < self.labels.len()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let label = *self.labels.get(self.position)?;
        self.position += 1;
        let values = vec![label as f64, label as f64];
        Some(Box::new(DenseInstance::new(Arc::clone(&self.header), values, 1.0)) as Box<dyn Instance>)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.position = 0;
        Ok(())
    }
}
