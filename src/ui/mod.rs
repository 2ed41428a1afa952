//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_header, display_header_stderr, display_status, display_success,
    display_sync_report, display_targets, display_warning,
};

/// Prompts for a new version, showing the current one as default.
///
/// # Returns
/// * `Ok(Some(String))` - The entered version
/// * `Ok(None)` - If the user pressed Enter, meaning keep the current version
/// * `Err` - If input error occurs
pub fn prompt_new_version(current: &str) -> Result<Option<String>> {
    print!("\nNew version [{}]: ", current);
    io::stdout().flush()?;

    read_new_version(&mut io::stdin().lock())
}

fn read_new_version(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    input.read_line(&mut line)?;

    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}
