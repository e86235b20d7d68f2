mod basic_classification_evaluator;
mod snapshot;

pub use basic_classification_evaluator::BasicClassificationEvaluator;
pub use snapshot::Snapshot;
