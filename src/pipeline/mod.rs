pub mod batch;
pub mod core;
pub mod keys;
pub mod nodes;
pub mod runner;

pub use batch::{BatchOutcome, BatchProcessor};
pub use self::core::{PipeMap, PipeNode, Pipeline};
pub use keys::TypedKey;
pub use runner::{PipelineRunner, RunOptions, RunSummary, batch_id};
