//! Persistent post collection.
//!
//! `CollectionStore` owns the JSON array every accepted post is appended to.
//! Entries keep insertion order and are never reordered or deduplicated.

mod store;

pub use store::CollectionStore;
