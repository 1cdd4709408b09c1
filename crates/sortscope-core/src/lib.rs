pub mod algorithm;
pub mod error;
pub mod ops;
pub mod recorder;
pub mod trace;

// Re-export commonly used types
pub use algorithm::Algorithm;
pub use error::CoreError;
pub use ops::{CmpOp, HighlightColor, IndexList, Operation, OperationKind};
pub use recorder::TraceRecorder;
pub use trace::{OperationCounts, Trace, TraceMessage};
