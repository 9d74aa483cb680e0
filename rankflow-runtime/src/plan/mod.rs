pub mod execution_plan;
pub mod run_spec;
