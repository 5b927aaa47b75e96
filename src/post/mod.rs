//! Blog post record.
//!
//! - `BlogPost`: the nine-field post as published in the collection
//! - `REQUIRED_FIELDS`: JSON field names every artifact must carry

mod model;

pub use model::{BlogPost, DEFAULT_COVER_DIR, REQUIRED_FIELDS};
