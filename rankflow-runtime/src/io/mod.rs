pub mod file;
pub mod graph_input;
pub mod storage;
