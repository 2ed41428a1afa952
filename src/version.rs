use std::fmt;
use std::str::FromStr;

use crate::error::{PluginVersionError, Result};

/// A loosely semver-shaped version token such as `1.2.3` or `1.0.0-beta.2`.
///
/// Only ASCII letters, digits, dots and hyphens are accepted. Strict SemVer is
/// not required; `1.2` and `1.0.0-beta.2` are both valid tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionString(String);

impl VersionString {
    /// Validates and wraps a version token.
    ///
    /// # Returns
    /// * `Ok(VersionString)` - Token made only of `[0-9.a-z-]` (any letter case)
    /// * `Err(EmptyVersion)` - If the token is empty
    /// * `Err(InvalidVersion)` - If the token contains any other character
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(PluginVersionError::EmptyVersion);
        }

        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
        {
            return Err(PluginVersionError::invalid_version(format!(
                "'{}' contains unexpected character '{}'",
                raw, bad
            )));
        }

        Ok(VersionString(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stability of this version, see [`classify`].
    pub fn stability(&self) -> StabilityClass {
        classify(&self.0)
    }
}

impl FromStr for VersionString {
    type Err = PluginVersionError;

    fn from_str(s: &str) -> Result<Self> {
        VersionString::parse(s)
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VersionString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether a version is a final release or a pre-release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityClass {
    Stable,
    Prerelease,
}

impl StabilityClass {
    pub fn is_stable(&self) -> bool {
        matches!(self, StabilityClass::Stable)
    }
}

impl fmt::Display for StabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StabilityClass::Stable => write!(f, "stable"),
            StabilityClass::Prerelease => write!(f, "prerelease"),
        }
    }
}

/// Classifies a version: stable iff it contains no alphabetic character.
///
/// # Example
/// ```ignore
/// assert_eq!(classify("1.2.3"), StabilityClass::Stable);
/// assert_eq!(classify("1.2.3-beta"), StabilityClass::Prerelease);
/// ```
pub fn classify(version: &str) -> StabilityClass {
    if version.chars().any(|c| c.is_alphabetic()) {
        StabilityClass::Prerelease
    } else {
        StabilityClass::Stable
    }
}

/// Picks the version a synchronization run should write.
///
/// An absent or blank `requested` falls back to `fallback`, which turns the run
/// into a re-stamp of the current version. Nothing is ever invented: if both
/// are empty the result is `EmptyVersion`.
pub fn resolve_effective_version(requested: Option<&str>, fallback: &str) -> Result<VersionString> {
    let requested = requested.map(str::trim).filter(|v| !v.is_empty());

    match requested {
        Some(version) => VersionString::parse(version),
        None => VersionString::parse(fallback.trim()),
    }
}

/// Represents the type of semantic version bump to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

/// Bumps a version according to the specified bump type.
///
/// Increments the appropriate component and resets lower components to 0:
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// Pre-release and build metadata are dropped. The current version must be a
/// full `MAJOR.MINOR.PATCH` SemVer string.
///
/// # Example
/// ```ignore
/// let v = VersionString::parse("1.2.3")?;
/// assert_eq!(bump_version(&v, VersionBump::Minor)?.as_str(), "1.3.0");
/// ```
pub fn bump_version(current: &VersionString, bump_type: VersionBump) -> Result<VersionString> {
    let parsed = semver::Version::parse(current.as_str()).map_err(|e| {
        PluginVersionError::invalid_version(format!(
            "cannot bump '{}': not a MAJOR.MINOR.PATCH version ({})",
            current, e
        ))
    })?;

    let next = match bump_type {
        VersionBump::Major => semver::Version::new(parsed.major + 1, 0, 0),
        VersionBump::Minor => semver::Version::new(parsed.major, parsed.minor + 1, 0),
        VersionBump::Patch => semver::Version::new(parsed.major, parsed.minor, parsed.patch + 1),
    };

    VersionString::parse(&next.to_string())
}
