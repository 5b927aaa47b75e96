//! Publication gate and retry policy.
//!
//! Runs sanitize → validate → (one repair cycle) → re-validate around a
//! single artifact file and decides whether the publish stage may run.

mod policy;

pub use policy::{GateDecision, GateOutcome, GateState, PublicationGate};
