pub mod dedup;
pub mod fingerprint;

pub use dedup::{FingerprintDiff, ViolationGroup, ViolationHistory, group_failures};
pub use fingerprint::{Fingerprint, FingerprintContribution, ScanStatus};
