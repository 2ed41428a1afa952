//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Line builders return plain strings so they can be tested; `display_*` functions print.

use console::style;

use crate::domain::{SyncReport, UpdateStatus, UpdatedFile, VersionedFile};
use crate::warning::SyncWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a synchronization warning to the user.
pub fn display_warning(warning: &SyncWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Builds the banner shown before every command.
///
/// ```ignore
/// Plugin Version: acme-forms
/// --------------------------
/// Plugin version: 1.2.3
/// ```
pub fn format_header(plugin_name: &str, version: &str) -> String {
    let title = format!("Plugin Version: {}", plugin_name);
    format!(
        "{}\n{}\nPlugin version: {}",
        title,
        "-".repeat(title.chars().count()),
        version
    )
}

/// Display the plugin banner.
pub fn display_header(plugin_name: &str, version: &str) {
    println!("\n{}\n", style(format_header(plugin_name, version)).bold());
}

/// Display the plugin banner on stderr, leaving stdout for scriptable output.
pub fn display_header_stderr(plugin_name: &str, version: &str) {
    eprintln!("\n{}\n", style(format_header(plugin_name, version)).bold());
}

/// Builds the status line for one target, without styling.
pub fn format_update_line(file: &UpdatedFile, dry_run: bool) -> String {
    match &file.status {
        UpdateStatus::Updated { replacements } => {
            let verb = if dry_run { "Would update" } else { "Updated" };
            let noun = if *replacements == 1 { "occurrence" } else { "occurrences" };
            format!("{} {} ({} {})", verb, file.label, replacements, noun)
        }
        UpdateStatus::Skipped(reason) => format!("Skipped {}: {}", file.label, reason),
        UpdateStatus::Failed(message) => format!("Failed {}: {}", file.label, message),
    }
}

/// Display one line per target followed by warnings and a summary.
///
/// Targets whose file is absent from this layout are left out.
pub fn display_sync_report(report: &SyncReport) {
    println!(
        "\n{}",
        style(format!(
            "Version {} -> {} ({})",
            report.previous, report.version, report.stability
        ))
        .bold()
    );

    for file in &report.files {
        let line = format_update_line(file, report.dry_run);
        match &file.status {
            UpdateStatus::Updated { .. } => display_success(&line),
            UpdateStatus::Skipped(crate::domain::SkipReason::MissingFile) => {}
            UpdateStatus::Skipped(_) => display_status(&line),
            UpdateStatus::Failed(_) => display_error(&line),
        }
    }

    for warning in &report.warnings {
        display_warning(warning);
    }

    let updated = report.updated().count();
    let failed = report.failed().count();
    println!(
        "\n{} target(s) {}, {} failed",
        updated,
        if report.dry_run { "would be updated" } else { "updated" },
        failed
    );
}

/// Display the resolved target table.
pub fn display_targets(targets: &[VersionedFile]) {
    println!("{}", style("Version targets:").bold());
    for (i, target) in targets.iter().enumerate() {
        let marker = if target.stable_only { " [stable only]" } else { "" };
        let present = if target.path.exists() { "" } else { " (absent)" };
        println!("  {}. {}{}{}", i + 1, target, marker, present);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SkipReason;
    use std::path::PathBuf;

    fn file(status: UpdateStatus) -> UpdatedFile {
        UpdatedFile {
            path: PathBuf::from("src/readme.txt"),
            label: "src/readme.txt (stable tag)".to_string(),
            status,
        }
    }

    #[test]
    fn test_format_header() {
        assert_eq!(
            format_header("acme", "1.2.3"),
            "Plugin Version: acme\n--------------------\nPlugin version: 1.2.3"
        );
    }

    #[test]
    fn test_format_update_line_updated() {
        let line = format_update_line(&file(UpdateStatus::Updated { replacements: 1 }), false);
        assert_eq!(line, "Updated src/readme.txt (stable tag) (1 occurrence)");
    }

    #[test]
    fn test_format_update_line_dry_run() {
        let line = format_update_line(&file(UpdateStatus::Updated { replacements: 2 }), true);
        assert!(line.starts_with("Would update"));
        assert!(line.ends_with("(2 occurrences)"));
    }

    #[test]
    fn test_format_update_line_skipped() {
        let line = format_update_line(&file(UpdateStatus::Skipped(SkipReason::Prerelease)), false);
        assert_eq!(line, "Skipped src/readme.txt (stable tag): unstable version");
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
