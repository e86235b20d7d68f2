pub mod vec_stream;
