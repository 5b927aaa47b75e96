//! Machine-readable command output.
//!
//! - `OutputWriter`: prints results as plain text or a single JSON object
//! - `GateOutput`: serializable view of a gate outcome

mod writer;

pub use writer::{GateOutput, OutputWriter};
