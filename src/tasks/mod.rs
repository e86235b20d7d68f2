mod errors;
mod holdout_evaluator;
mod prequential_evaluator;

pub use errors::TaskError;
pub use holdout_evaluator::HoldoutEvaluator;
pub use prequential_evaluator::PrequentialEvaluator;
