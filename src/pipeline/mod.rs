//! End-to-end publication run.
//!
//! - `Pipeline`: credentials → generate → locate → gate → publish
//! - `Publisher`: collection merge, artifact removal, git deploy, success
//!   notification for one accepted post
//! - `RunReport`: what the run tells the operator and the notifier

mod publisher;
mod report;
mod runner;

pub use publisher::{PublishOutcome, Publisher};
pub use report::{RunReport, RunStatus};
pub use runner::Pipeline;
