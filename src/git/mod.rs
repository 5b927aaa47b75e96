//! Git CLI operations.
//!
//! `GitRunner` shells out to the `git` executable for the three operations
//! publication needs: stage, commit and push. Exit status and captured
//! output are the only contract relied on.

mod runner;

pub use runner::{CommitOutcome, GitRunner};
