use std::fmt;
use std::path::PathBuf;

use crate::version::{StabilityClass, VersionString};
use crate::warning::SyncWarning;

/// Why a target was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file does not exist in this project layout
    MissingFile,
    /// The file exists but has no version marker
    NoMarker,
    /// The target only tracks stable versions
    Prerelease,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingFile => write!(f, "file not present"),
            SkipReason::NoMarker => write!(f, "no version marker"),
            SkipReason::Prerelease => write!(f, "unstable version"),
        }
    }
}

/// Outcome of a single target update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Updated { replacements: usize },
    Skipped(SkipReason),
    Failed(String),
}

/// One entry of a synchronization report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedFile {
    pub path: PathBuf,
    /// Human readable target description
    pub label: String,
    pub status: UpdateStatus,
}

impl UpdatedFile {
    pub fn is_updated(&self) -> bool {
        matches!(self.status, UpdateStatus::Updated { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, UpdateStatus::Failed(_))
    }
}

/// Result of a full synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub previous: VersionString,
    pub version: VersionString,
    pub stability: StabilityClass,
    /// Nothing was written to disk
    pub dry_run: bool,
    pub files: Vec<UpdatedFile>,
    pub warnings: Vec<SyncWarning>,
}

impl SyncReport {
    pub fn updated(&self) -> impl Iterator<Item = &UpdatedFile> {
        self.files.iter().filter(|f| f.is_updated())
    }

    pub fn failed(&self) -> impl Iterator<Item = &UpdatedFile> {
        self.files.iter().filter(|f| f.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}
