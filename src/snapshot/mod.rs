pub mod ancestry;
pub mod builder;
pub mod cancel;
pub mod counter;
pub mod fixture;
pub mod provider;

pub use builder::{DEFAULT_MAX_ELEMENTS, DisposalStrategy, ScanMode, Snapshot, SnapshotBuilder};
pub use cancel::CancellationToken;
pub use counter::BoundedCounter;
pub use fixture::{FixtureHandle, FixtureNode, MemoryProvider};
pub use provider::{ElementProvider, OwnedHandle};
