mod spies;
mod streams;

pub use spies::update_spy_classifier::{UpdateSpyClassifier, UpdateSpyHandle};
pub use streams::vec_stream::VecStream;
