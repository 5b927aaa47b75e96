//! Web search for the research step.
//!
//! - `SearchClient`: Serper API client
//! - `SearchResult`: one organic hit, rendered as `Title/Summary/Source`

mod client;

pub use client::{SearchClient, SearchResult, format_results};
