pub mod executor;
pub mod partitioned_dataset;

pub use executor::StageExecutor;
pub use partitioned_dataset::PartitionedDataset;
