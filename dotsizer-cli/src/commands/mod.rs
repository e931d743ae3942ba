pub mod batch;
pub mod common;
pub mod top;
pub mod tree;
