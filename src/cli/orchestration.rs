//! Main workflow orchestration logic
//!
//! Keeps the version workflow out of main.rs so it can be driven
//! programmatically without depending on clap.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config;
use crate::domain::SyncReport;
use crate::sync::VersionSynchronizer;
use crate::ui;
use crate::version::VersionBump;

/// What the version workflow should write.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionAction {
    /// Explicit version, or `None` to ask (interactive) or re-stamp the current one
    Set(Option<String>),
    /// Derive the next version from the current one
    Bump(VersionBump),
}

/// Arguments for the version workflow
#[derive(Debug, Clone, PartialEq)]
pub struct VersionWorkflowArgs {
    pub action: VersionAction,

    /// Skip prompts
    pub force: bool,

    /// Preview mode - compute changes without writing
    pub dry_run: bool,

    /// Whether stdin is attached to a terminal
    pub interactive: bool,
}

/// Loads configuration and binds it to the project at `root`.
pub fn load_synchronizer(root: &Path, config_path: Option<&Path>) -> Result<VersionSynchronizer> {
    let config_path: Option<PathBuf> = config_path.map(|p| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            root.join(p)
        }
    });

    let config = match config_path {
        Some(path) => config::load_config(Some(path.as_path()))?,
        None => {
            let local = root.join(config::CONFIG_FILE_NAME);
            if local.exists() {
                config::load_config(Some(local.as_path()))?
            } else {
                config::load_config(None)?
            }
        }
    };

    VersionSynchronizer::new(root, config).context("Failed to initialize plugin project")
}

/// Main version workflow
///
/// 1. Print the plugin header with the current version
/// 2. Resolve the version to write (argument, prompt, bump or re-stamp)
/// 3. Rewrite every target and print the report
///
/// Fatal conditions (missing canonical file, no version marker, empty or
/// invalid version) are returned as errors before anything is written.
/// Per-target failures are part of the returned report.
pub fn run_version_workflow(
    sync: &VersionSynchronizer,
    args: VersionWorkflowArgs,
) -> Result<SyncReport> {
    let current = sync.current_version()?;
    ui::display_header(sync.plugin_name(), current.as_str());

    let report = match args.action {
        VersionAction::Set(requested) => {
            let requested = match requested {
                Some(version) => Some(version),
                None if args.interactive && !args.force => {
                    ui::prompt_new_version(current.as_str())?
                }
                None => None,
            };

            ui::display_status(&format!("Original version: {}", current));
            sync.synchronize(requested.as_deref(), args.dry_run)?
        }
        VersionAction::Bump(bump_type) => {
            ui::display_status(&format!("Original version: {}", current));
            sync.bump(bump_type, args.dry_run)?
        }
    };

    ui::display_sync_report(&report);

    if !report.dry_run {
        ui::display_status(&format!("Current version: {}", sync.current_version()?));
    }

    Ok(report)
}
