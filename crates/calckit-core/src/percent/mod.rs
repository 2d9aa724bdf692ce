pub mod operations;
pub mod tip;
