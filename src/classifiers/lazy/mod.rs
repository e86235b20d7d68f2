mod attribute_ranges;
mod neighbor_classifier;

pub use attribute_ranges::{AttributeRanges, RANGE_EPSILON, Range};
pub use neighbor_classifier::{NeighborClassifier, NeighborParameters};
