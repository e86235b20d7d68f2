mod dataset;
mod dense_instance;
mod instance;

pub use dataset::Dataset;
pub use dense_instance::DenseInstance;
pub use instance::Instance;
