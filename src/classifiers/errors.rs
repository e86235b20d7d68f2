use crate::core::capabilities::CapabilityError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ClassifierError {
    #[error("dataset is incompatible with the classifier: {0}")]
    DataIncompatible(#[from] CapabilityError),
    #[error("instance header does not match the training header")]
    SchemaMismatch,
    #[error("no training instances")]
    EmptyTrainingSet,
    #[error("classifier has not been trained")]
    NotTrained,
    #[error("classifier has already been trained")]
    AlreadyTrained,
}
