//! Post-generation validation and repair.
//!
//! Decides, deterministically, whether untrusted generator output is a
//! publishable post:
//! - `sanitize`, `sanitize_aggressive`: control-character stripping
//! - `repair_json`: best-effort repair of a broken JSON object
//! - `Validator`: strict schema and business-rule checks
//! - `ValidationResult`: accumulated issues plus cleaned text

mod repair;
mod result;
mod sanitize;
mod validator;

pub use repair::{Repair, RepairStrategy, repair_file, repair_json};
pub use result::{IssueKind, ValidationIssue, ValidationResult};
pub use sanitize::{sanitize, sanitize_aggressive};
pub use validator::{Validator, validate_post};

/// Parser failure text that makes a failed artifact eligible for repair.
pub const CONTROL_CHARACTER_SIGNATURE: &str = "control character";
