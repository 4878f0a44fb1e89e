pub mod json_store;
pub mod writer;
