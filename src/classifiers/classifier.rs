use crate::classifiers::{ClassifierError, TechnicalInformation};
use crate::core::capabilities::Capabilities;
use crate::core::instances::{Dataset, Instance};

pub trait Classifier {
    fn capabilities(&self) -> Capabilities;
    fn train(&mut self, dataset: &Dataset) -> Result<(), ClassifierError>;
    /// Predicted class code for `instance`.
    fn classify(&mut self, instance: &dyn Instance) -> Result<usize, ClassifierError>;
    fn calc_memory_size(&self) -> usize;
}

pub trait UpdateableClassifier: Classifier {
    fn update(&mut self, instance: &dyn Instance) -> Result<(), ClassifierError>;
}

/// Human-readable metadata shown by hosts next to a learner.
pub trait Describe {
    fn name(&self) -> &'static str;
    fn global_info(&self) -> String;
    fn technical_information(&self) -> TechnicalInformation;
}
