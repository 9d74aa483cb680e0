pub mod rank_table;
pub mod run_summary;

pub use rank_table::RankTable;
pub use run_summary::{RunSummary, Termination};
