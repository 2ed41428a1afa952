//! Domain logic - version targets and synchronization outcomes

pub mod report;
pub mod target;

pub use report::{SkipReason, SyncReport, UpdateStatus, UpdatedFile};
pub use target::{
    canonical_path, default_targets, header_version_pattern, Locator, VersionedFile,
};
