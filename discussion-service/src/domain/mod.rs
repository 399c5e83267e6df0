pub mod models;
pub mod tree;
