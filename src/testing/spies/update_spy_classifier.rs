use crate::classifiers::{Classifier, ClassifierError, UpdateableClassifier};
use crate::core::capabilities::{Capabilities, Capability};
use crate::core::instances::{Dataset, Instance};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Clone)]
pub struct UpdateSpyHandle {
    classified: Arc<AtomicU64>,
    updated: Arc<AtomicU64>,
}

impl UpdateSpyHandle {
    pub fn classified(&self) -> u64 {
        self.classified.load(Ordering::Relaxed)
    }

    pub fn updated(&self) -> u64 {
        self.updated.load(Ordering::Relaxed)
    }
}

/// Predicts the true class and counts calls.
pub struct UpdateSpyClassifier {
    handle: UpdateSpyHandle,
}

impl UpdateSpyClassifier {
    pub fn new() -> (Self, UpdateSpyHandle) {
        let handle = UpdateSpyHandle {
            classified: Arc::new(AtomicU64::new(0)),
            updated: Arc::new(AtomicU64::new(0)),
        };
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }
}

impl Classifier for UpdateSpyClassifier {
    fn capabilities(&self) -> Capabilities {
        Capabilities::none()
            .with(Capability::NumericAttributes)
            .with(Capability::NominalClass)
    }

    fn train(&mut self, dataset: &Dataset) -> Result<(), ClassifierError> {
        self.capabilities().test_with_fail(dataset)?;
        Ok(())
    }

    fn classify(&mut self, instance: &dyn Instance) -> Result<usize, ClassifierError> {
        self.handle.classified.fetch_add(1, Ordering::Relaxed);
        Ok(instance.class_value().unwrap_or_default() as usize)
    }

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>()
    }
}

impl UpdateableClassifier for UpdateSpyClassifier {
    fn update(&mut self, _instance: &dyn Instance) -> Result<(), ClassifierError> {
        self.handle.updated.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
