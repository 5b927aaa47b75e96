pub mod artifact;
pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod gate;
pub mod generation;
pub mod git;
pub mod notification;
pub mod output;
pub mod pipeline;
pub mod post;
pub mod search;
pub mod utils;
pub mod validation;

pub use artifact::ArtifactLocator;
pub use collection::CollectionStore;
pub use config::{BlogConfig, Credentials};
pub use error::{BlogError, Result};
pub use gate::{GateDecision, GateOutcome, GateState, PublicationGate};
pub use git::GitRunner;
pub use notification::{Notifier, PublishEvent};
pub use pipeline::{Pipeline, Publisher, RunReport, RunStatus};
pub use post::BlogPost;
pub use search::SearchClient;
pub use validation::{ValidationResult, Validator, repair_json, sanitize, validate_post};
