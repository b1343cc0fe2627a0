//! Accessibility scanning over captured UI element trees.
//!
//! A scan captures the target element, its ancestors and a bounded set of
//! descendants from an [`snapshot::ElementProvider`], runs the rule catalog
//! on the target and its descendants, and fingerprints the failures so they
//! can be deduplicated across runs.

pub mod cli;
pub mod condition;
pub mod element;
pub mod error;
pub mod fingerprint;
pub mod report;
pub mod rules;
pub mod snapshot;
pub mod trace;

pub use error::{EvaluationError, ProviderError, ScanError};
