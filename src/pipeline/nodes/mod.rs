pub mod batch;

pub use batch::{CorrelatorNode, OutputWriterNode, TableReaderNode, VerifierNode};
