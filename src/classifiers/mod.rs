mod classifier;
mod errors;
pub mod lazy;
mod technical_information;

pub use classifier::{Classifier, Describe, UpdateableClassifier};
pub use errors::ClassifierError;
pub use technical_information::{Field, PublicationType, TechnicalInformation};
