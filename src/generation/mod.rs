//! Post generation.
//!
//! The research → write → QA agents run in an external process. This module
//! prepares what they are asked for and runs that process:
//! - `WritingBrief`: date, byline, read time, topic angle and format rules
//! - `Generator`: spawns the configured command with the brief

mod brief;
mod generator;

pub use brief::{WritingBrief, today};
pub use generator::{GenerationOutput, Generator};
