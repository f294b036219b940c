//! Snapshot aggregation for kubesnap
//!
//! One namespace listing fixes the key set, then every (namespace,
//! kind) pair becomes an independent list query run under a bounded
//! fan-out. Individual query failures are recorded in the snapshot;
//! losing the control plane or being cancelled aborts the scan.

mod builder;
mod error;

pub use builder::SnapshotBuilder;
pub use error::SnapshotError;
