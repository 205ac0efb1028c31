pub mod builder;
pub mod cache;
pub mod operations;
pub mod source;
pub mod tree;
