//! Shared utility functions.
//!
//! - String truncation (UTF-8 safe, boundary-aware)
//! - Context windows around byte offsets for diagnostics

mod string;

pub use string::{context_window, truncate_chars, truncate_with_marker};
