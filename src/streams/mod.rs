pub mod arff;
mod stream;

pub use stream::Stream;
