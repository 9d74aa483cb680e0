pub mod function;
pub mod pipeline;
