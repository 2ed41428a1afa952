//! Plugin metadata read from `composer.json`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PluginVersionError, Result};

pub const MANIFEST_FILE_NAME: &str = "composer.json";

#[derive(Debug, Deserialize)]
struct ComposerManifest {
    name: Option<String>,
}

/// Reads the plugin slug from `<dir>/composer.json`.
///
/// The package name is vendor-qualified (`vendor/plugin`); only the last
/// segment is returned.
///
/// # Returns
/// * `Ok(String)` - The plugin slug
/// * `Err(FileNotFound)` - If there is no manifest in `dir`
/// * `Err(Manifest)` - If the manifest is malformed or has no name
pub fn plugin_name_from_manifest(dir: &Path) -> Result<String> {
    let path = dir.join(MANIFEST_FILE_NAME);
    if !path.exists() {
        return Err(PluginVersionError::file_not_found(&path));
    }

    let content = fs::read_to_string(&path)?;
    plugin_name_from_str(&content)
        .map_err(|e| PluginVersionError::manifest(format!("{}: {}", path.display(), e)))
}

fn plugin_name_from_str(content: &str) -> std::result::Result<String, String> {
    let manifest: ComposerManifest =
        serde_json::from_str(content.trim()).map_err(|e| e.to_string())?;

    let name = manifest
        .name
        .ok_or_else(|| "missing \"name\" field".to_string())?;

    match name.rsplit('/').next().map(str::trim) {
        Some(slug) if !slug.is_empty() => Ok(slug.to_string()),
        _ => Err(format!("cannot derive a plugin name from '{}'", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_qualified_name() {
        assert_eq!(
            plugin_name_from_str(r#"{"name": "pressshack/acme-forms"}"#).unwrap(),
            "acme-forms"
        );
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(
            plugin_name_from_str(r#"{"name": "acme-forms", "type": "wordpress-plugin"}"#).unwrap(),
            "acme-forms"
        );
    }

    #[test]
    fn test_missing_name() {
        assert!(plugin_name_from_str(r#"{"type": "library"}"#).is_err());
    }

    #[test]
    fn test_trailing_slash_rejected() {
        assert!(plugin_name_from_str(r#"{"name": "vendor/"}"#).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(plugin_name_from_str("{ name: ").is_err());
    }

    #[test]
    fn test_missing_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = plugin_name_from_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, PluginVersionError::FileNotFound(_)));
    }
}
