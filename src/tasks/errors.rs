use crate::classifiers::ClassifierError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error("test data header does not match the training header")]
    HeaderMismatch,
    #[error("{0} must be > 0")]
    InvalidParameter(&'static str),
}
