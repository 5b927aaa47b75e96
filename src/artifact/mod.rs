//! Generated post artifacts in the working directory.
//!
//! - `ArtifactLocator`: finds the newest candidate `*.json` artifact
//! - `preserve_debug_copy`: keeps a copy of a rejected artifact

mod locator;

pub use locator::{ArtifactLocator, debug_copy_path, preserve_debug_copy};
