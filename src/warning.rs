use std::fmt;

/// Non-fatal conditions met while synchronizing versions.
/// These should be reported to the user but never abort a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    /// The new version is a pre-release, so stable-only targets are left alone
    UnstableVersion { version: String, paths: Vec<String> },
    /// A target file exists but its version marker was not found
    MissingMarker { path: String, marker: String },
    /// The canonical file does not report the version that was just written
    CanonicalMismatch { expected: String, found: String },
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::UnstableVersion { version, paths } => {
                write!(
                    f,
                    "Unstable version '{}' detected, stable-only targets not updated: {}",
                    version,
                    paths.join(", ")
                )
            }
            SyncWarning::MissingMarker { path, marker } => {
                write!(f, "No {} marker found in '{}'", marker, path)
            }
            SyncWarning::CanonicalMismatch { expected, found } => {
                write!(
                    f,
                    "Canonical file reports version '{}' after update, expected '{}'",
                    found, expected
                )
            }
        }
    }
}
