//! Version synchronization across the files of a plugin.
//!
//! The pipeline is linear: read the canonical file, resolve the version to
//! write, classify it, then rewrite every target in a fixed order. Targets are
//! independent; a failure on one is recorded and the run moves on.

use std::fs;
use std::path::{Path, PathBuf};

use regex::bytes::Regex;

use crate::config::{Config, MissingMarkerPolicy};
use crate::domain::{
    canonical_path, default_targets, header_version_pattern, Locator, SkipReason, SyncReport,
    UpdateStatus, UpdatedFile, VersionedFile,
};
use crate::error::{PluginVersionError, Result};
use crate::manifest;
use crate::version::{self, StabilityClass, VersionBump, VersionString};
use crate::warning::SyncWarning;

/// Reads the current version from the canonical file.
///
/// # Returns
/// * `Ok(VersionString)` - Token of the first `Version: X` marker, any case
/// * `Err(FileNotFound)` - If the file does not exist
/// * `Err(VersionNotFound)` - If there is no marker or its token is empty
pub fn get_current_version(path: &Path) -> Result<VersionString> {
    if !path.exists() {
        return Err(PluginVersionError::file_not_found(path));
    }

    let content = fs::read(path)?;
    let re = Regex::new(&header_version_pattern())?;

    let token = re
        .captures(&content)
        .and_then(|caps| caps.get(2))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| PluginVersionError::version_not_found(path))?;

    VersionString::parse(&token)
}

/// Fails unless `target` exists and carries its version marker.
///
/// Used on the canonical header before anything is written, so that a run
/// never updates the other files while leaving the source of truth behind.
pub fn ensure_marker(target: &VersionedFile) -> Result<()> {
    if !target.path.exists() {
        return Err(PluginVersionError::file_not_found(&target.path));
    }

    let content = fs::read(&target.path)?;
    if target.compile()?.is_match(&content) {
        Ok(())
    } else {
        Err(PluginVersionError::version_not_found(&target.path))
    }
}

/// Writes `new_version` into every target, in order.
///
/// Fails only when `new_version` is empty or malformed. Per-file problems are
/// reported in the returned list.
pub fn set_version(
    new_version: &str,
    targets: &[VersionedFile],
    policy: MissingMarkerPolicy,
) -> Result<Vec<UpdatedFile>> {
    let version = VersionString::parse(new_version)?;
    Ok(apply_targets(&version, targets, policy, false))
}

/// Rewrites each target with `version`, returning one entry per target.
///
/// Missing files are skipped, stable-only targets are skipped for
/// pre-releases, and a target without a marker follows `policy`. With
/// `dry_run` the new content is computed but never written.
pub fn apply_targets(
    version: &VersionString,
    targets: &[VersionedFile],
    policy: MissingMarkerPolicy,
    dry_run: bool,
) -> Vec<UpdatedFile> {
    let stability = version.stability();

    targets
        .iter()
        .map(|target| UpdatedFile {
            path: target.path.clone(),
            label: target.to_string(),
            status: update_target(target, version, stability, policy, dry_run),
        })
        .collect()
}

fn update_target(
    target: &VersionedFile,
    version: &VersionString,
    stability: StabilityClass,
    policy: MissingMarkerPolicy,
    dry_run: bool,
) -> UpdateStatus {
    let path = &target.path;

    if !path.exists() {
        tracing::debug!(path = %path.display(), "target not present, skipping");
        return UpdateStatus::Skipped(SkipReason::MissingFile);
    }

    if target.stable_only && !stability.is_stable() {
        tracing::info!(path = %path.display(), %version, "skipping stable-only target");
        return UpdateStatus::Skipped(SkipReason::Prerelease);
    }

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) => return UpdateStatus::Failed(format!("read failed: {}", e)),
    };

    let (rewritten, replacements) = match target.rewrite(&content, version.as_str()) {
        Ok(Some(result)) => result,
        Ok(None) => {
            return match policy {
                MissingMarkerPolicy::Skip | MissingMarkerPolicy::Warn => {
                    tracing::debug!(path = %path.display(), locator = %target.locator, "no marker");
                    UpdateStatus::Skipped(SkipReason::NoMarker)
                }
                MissingMarkerPolicy::Error => {
                    UpdateStatus::Failed(format!("no {} marker found", target.locator))
                }
            };
        }
        Err(e) => return UpdateStatus::Failed(e.to_string()),
    };

    if !dry_run {
        if let Err(e) = fs::write(path, rewritten) {
            return UpdateStatus::Failed(format!("write failed: {}", e));
        }
    }

    tracing::info!(path = %path.display(), replacements, dry_run, "target updated");
    UpdateStatus::Updated { replacements }
}

/// Collects the warnings a finished run should surface.
fn collect_warnings(
    version: &VersionString,
    targets: &[VersionedFile],
    files: &[UpdatedFile],
    policy: MissingMarkerPolicy,
) -> Vec<SyncWarning> {
    let mut warnings = Vec::new();

    let held_back: Vec<String> = files
        .iter()
        .filter(|f| f.status == UpdateStatus::Skipped(SkipReason::Prerelease))
        .map(|f| f.path.display().to_string())
        .collect();
    if !held_back.is_empty() {
        warnings.push(SyncWarning::UnstableVersion {
            version: version.to_string(),
            paths: held_back,
        });
    }

    if policy == MissingMarkerPolicy::Warn {
        for (target, file) in targets.iter().zip(files) {
            if file.status == UpdateStatus::Skipped(SkipReason::NoMarker) {
                warnings.push(SyncWarning::MissingMarker {
                    path: file.path.display().to_string(),
                    marker: target.locator.to_string(),
                });
            }
        }
    }

    warnings
}

/// Keeps every copy of a plugin's version string in step with the canonical file.
#[derive(Debug, Clone)]
pub struct VersionSynchronizer {
    config: Config,
    source_dir: PathBuf,
    plugin_name: String,
}

impl VersionSynchronizer {
    /// Binds a configuration to a project root.
    ///
    /// When `plugin.name` is not configured it is read from `composer.json`,
    /// first in the project root and then in the source directory.
    pub fn new(root: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate()?;

        let root = root.as_ref();
        let source_dir = root.join(&config.plugin.source_path);

        let plugin_name = match &config.plugin.name {
            Some(name) => name.clone(),
            None => match manifest::plugin_name_from_manifest(root) {
                Ok(name) => name,
                Err(PluginVersionError::FileNotFound(_)) => {
                    manifest::plugin_name_from_manifest(&source_dir).map_err(|e| match e {
                        PluginVersionError::FileNotFound(_) => PluginVersionError::config(
                            "plugin.name is not set and no composer.json was found",
                        ),
                        other => other,
                    })?
                }
                Err(e) => return Err(e),
            },
        };

        tracing::debug!(plugin = %plugin_name, source = %source_dir.display(), "synchronizer ready");

        Ok(VersionSynchronizer {
            config,
            source_dir,
            plugin_name,
        })
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn canonical_path(&self) -> PathBuf {
        canonical_path(&self.source_dir, &self.plugin_name)
    }

    /// The ordered target table for this plugin.
    pub fn targets(&self) -> Vec<VersionedFile> {
        default_targets(&self.source_dir, &self.plugin_name, &self.config)
    }

    pub fn current_version(&self) -> Result<VersionString> {
        get_current_version(&self.canonical_path())
    }

    /// Runs a full synchronization.
    ///
    /// `requested` falls back to the current version when absent or blank, so
    /// calling this with `None` re-stamps every target.
    pub fn synchronize(&self, requested: Option<&str>, dry_run: bool) -> Result<SyncReport> {
        let previous = self.current_version()?;
        let version = version::resolve_effective_version(requested, previous.as_str())?;
        self.write(previous, version, dry_run)
    }

    /// Computes the next version from the current one and synchronizes it.
    pub fn bump(&self, bump_type: VersionBump, dry_run: bool) -> Result<SyncReport> {
        let previous = self.current_version()?;
        let version = version::bump_version(&previous, bump_type)?;
        self.write(previous, version, dry_run)
    }

    fn write(
        &self,
        previous: VersionString,
        version: VersionString,
        dry_run: bool,
    ) -> Result<SyncReport> {
        let stability = version.stability();
        let policy = self.config.behavior.missing_marker;
        let targets = self.targets();

        tracing::info!(%previous, %version, %stability, dry_run, "synchronizing version");

        let canonical = self.canonical_path();
        if let Some(header) = targets
            .iter()
            .find(|t| t.path == canonical && t.locator == Locator::PluginHeader)
        {
            ensure_marker(header)?;
        }

        let files = apply_targets(&version, &targets, policy, dry_run);
        let mut warnings = collect_warnings(&version, &targets, &files, policy);

        if !dry_run {
            match self.current_version() {
                Ok(found) if found != version => warnings.push(SyncWarning::CanonicalMismatch {
                    expected: version.to_string(),
                    found: found.to_string(),
                }),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "could not re-read canonical version"),
            }
        }

        Ok(SyncReport {
            previous,
            version,
            stability,
            dry_run,
            files,
            warnings,
        })
    }
}
