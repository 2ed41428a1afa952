use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use regex::bytes::Regex;

use crate::config::Config;
use crate::error::Result;

/// Characters a version token may span inside a target file.
const TOKEN_CLASS: &str = r"[0-9A-Za-z.\-]+";

/// `Version:` marker of the plugin header, in any letter case and after any
/// comment prefix.
///
/// Shared by the canonical reader and the header writer so that a version the
/// tool can read is always a version it can rewrite.
const HEADER_MARKER: &str = r"(?i-u)(Version:\s*)";

/// Pattern the canonical reader uses; group 2 is the (possibly empty) token.
pub fn header_version_pattern() -> String {
    format!(r"{}([0-9A-Za-z.\-]*)", HEADER_MARKER)
}

/// Where a version token lives inside a target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// First `Version: X` marker of the plugin header comment
    PluginHeader,
    /// `Stable tag: X` line of readme.txt
    StableTag,
    /// `define('NAME', 'X')` and similar quoted key/value pairs
    Constant { name: String },
    /// User supplied pattern from configuration
    Custom {
        pattern: String,
        replacement: Option<String>,
    },
}

impl Locator {
    /// Regex source for this locator.
    pub fn pattern(&self) -> Cow<'_, str> {
        match self {
            Locator::PluginHeader => {
                Cow::Owned(format!("{}{}", HEADER_MARKER, TOKEN_CLASS))
            }
            Locator::StableTag => Cow::Owned(format!(r"(Stable tag:[ \t]*){}", TOKEN_CLASS)),
            Locator::Constant { name } => Cow::Owned(format!(
                r#"(['"]{}['"]\s*,\s*['"])[^'"]+(['"])"#,
                regex::escape(name)
            )),
            Locator::Custom { pattern, .. } => Cow::Borrowed(pattern),
        }
    }

    /// Maximum number of matches to replace, 0 meaning all of them.
    ///
    /// Only the first header marker counts as the plugin version, the same one
    /// [`header_version_pattern`] reads back.
    pub fn replace_limit(&self) -> usize {
        match self {
            Locator::PluginHeader => 1,
            _ => 0,
        }
    }

    /// Replacement template for a compiled pattern, with a `{version}` placeholder.
    ///
    /// Without an explicit template, capture groups are kept around the token:
    /// two groups are prefix and suffix, one group is the prefix.
    pub fn replacement(&self, regex: &Regex) -> String {
        if let Locator::Custom {
            replacement: Some(template),
            ..
        } = self
        {
            return template.clone();
        }

        match regex.captures_len() - 1 {
            0 => "{version}".to_string(),
            1 => "${1}{version}".to_string(),
            _ => "${1}{version}${2}".to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::PluginHeader => write!(f, "plugin header"),
            Locator::StableTag => write!(f, "stable tag"),
            Locator::Constant { name } => write!(f, "constant {}", name),
            Locator::Custom { pattern, .. } => write!(f, "pattern {}", pattern),
        }
    }
}

/// A file that embeds a copy of the version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedFile {
    pub path: PathBuf,
    pub locator: Locator,
    /// Only rewritten for stable versions
    pub stable_only: bool,
}

impl VersionedFile {
    pub fn new(path: impl Into<PathBuf>, locator: Locator) -> Self {
        VersionedFile {
            path: path.into(),
            locator,
            stable_only: false,
        }
    }

    pub fn stable_only(mut self) -> Self {
        self.stable_only = true;
        self
    }

    pub fn compile(&self) -> Result<Regex> {
        Ok(Regex::new(&self.locator.pattern())?)
    }

    /// Substitutes `version` for the token in `content`.
    ///
    /// Content is handled as raw bytes, so files in legacy encodings are
    /// rewritten as long as the marker itself is ASCII. Bytes outside the
    /// token are left untouched.
    ///
    /// # Returns
    /// * `Ok(Some((content, count)))` - Rewritten content and number of replacements
    /// * `Ok(None)` - If the pattern does not match
    /// * `Err` - If the pattern does not compile
    pub fn rewrite(&self, content: &[u8], version: &str) -> Result<Option<(Vec<u8>, usize)>> {
        let regex = self.compile()?;
        let limit = self.locator.replace_limit();

        let mut count = regex.find_iter(content).count();
        if count == 0 {
            return Ok(None);
        }
        if limit > 0 {
            count = count.min(limit);
        }

        let template = self.locator.replacement(&regex).replace("{version}", version);
        let rewritten = regex.replacen(content, limit, template.as_bytes()).into_owned();

        Ok(Some((rewritten, count)))
    }
}

impl fmt::Display for VersionedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.locator)
    }
}

/// Path of the main plugin file, which carries the authoritative version.
pub fn canonical_path(source_dir: &Path, plugin_name: &str) -> PathBuf {
    source_dir.join(format!("{}.php", plugin_name))
}

/// Builds the ordered target table for a plugin.
///
/// The canonical header comes first, then the readme stable tag, the version
/// constant in every file that usually defines it, and finally any targets
/// declared in configuration.
pub fn default_targets(source_dir: &Path, plugin_name: &str, config: &Config) -> Vec<VersionedFile> {
    let main_file = canonical_path(source_dir, plugin_name);
    let constant = || Locator::Constant {
        name: config.plugin.version_constant.clone(),
    };

    let mut targets = vec![
        VersionedFile::new(&main_file, Locator::PluginHeader),
        VersionedFile::new(source_dir.join("readme.txt"), Locator::StableTag).stable_only(),
        VersionedFile::new(&main_file, constant()),
    ];

    for include in ["includes.php", "defines.php", "src/includes.php", "src/defines.php"] {
        targets.push(VersionedFile::new(source_dir.join(include), constant()));
    }

    targets.extend(config.targets.iter().map(|target| VersionedFile {
        path: source_dir.join(&target.path),
        locator: Locator::Custom {
            pattern: target.pattern.clone(),
            replacement: target.replacement.clone(),
        },
        stable_only: target.stable_only,
    }));

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;

    fn rewrite(target: &VersionedFile, content: &str, version: &str) -> Option<String> {
        target
            .rewrite(content.as_bytes(), version)
            .unwrap()
            .map(|(c, _)| String::from_utf8(c).unwrap())
    }

    #[test]
    fn test_plugin_header_preserves_indentation() {
        let target = VersionedFile::new("acme.php", Locator::PluginHeader);
        let content = "<?php\n/**\n * Plugin Name: Acme\n *   Version:   1.0.0\n */\n";
        assert_eq!(
            rewrite(&target, content, "1.1.0").unwrap(),
            "<?php\n/**\n * Plugin Name: Acme\n *   Version:   1.1.0\n */\n"
        );
    }

    #[test]
    fn test_plugin_header_leaves_later_version_lines() {
        let target = VersionedFile::new("acme.php", Locator::PluginHeader);
        let content = " * Version: 1.0.0\n * Requires PHP Version: 7.4\n";
        assert_eq!(
            rewrite(&target, content, "2.0.0").unwrap(),
            " * Version: 2.0.0\n * Requires PHP Version: 7.4\n"
        );
    }

    #[test]
    fn test_stable_tag() {
        let target = VersionedFile::new("readme.txt", Locator::StableTag);
        let content = "=== Acme ===\nStable tag: 1.0.0\nLicense: GPLv2\n";
        assert_eq!(
            rewrite(&target, content, "1.0.1").unwrap(),
            "=== Acme ===\nStable tag: 1.0.1\nLicense: GPLv2\n"
        );
    }

    #[test]
    fn test_constant_keeps_quote_style() {
        let target = VersionedFile::new(
            "includes.php",
            Locator::Constant {
                name: "ACME_VERSION".to_string(),
            },
        );
        let content = "define( \"ACME_VERSION\",  \"1.0.0-beta\" );\ndefine('ACME_PATH', __DIR__);\n";
        assert_eq!(
            rewrite(&target, content, "1.0.0").unwrap(),
            "define( \"ACME_VERSION\",  \"1.0.0\" );\ndefine('ACME_PATH', __DIR__);\n"
        );
    }

    #[test]
    fn test_constant_name_is_escaped() {
        let target = VersionedFile::new(
            "includes.php",
            Locator::Constant {
                name: "ACME.VERSION".to_string(),
            },
        );
        assert!(rewrite(&target, "define('ACMEXVERSION', '1.0');", "2.0").is_none());
    }

    #[test]
    fn test_no_marker_returns_none() {
        let target = VersionedFile::new("readme.txt", Locator::StableTag);
        assert!(rewrite(&target, "no tag here\n", "1.0.0").is_none());
    }

    #[test]
    fn test_custom_pattern_with_prefix_and_suffix() {
        let target = VersionedFile::new(
            "package.json",
            Locator::Custom {
                pattern: r#"("version":\s*")[^"]+(")"#.to_string(),
                replacement: None,
            },
        );
        let content = "{\n  \"version\": \"1.0.0\",\n  \"private\": true\n}\n";
        assert_eq!(
            rewrite(&target, content, "1.2.0").unwrap(),
            "{\n  \"version\": \"1.2.0\",\n  \"private\": true\n}\n"
        );
    }

    #[test]
    fn test_custom_pattern_with_template() {
        let target = VersionedFile::new(
            "style.css",
            Locator::Custom {
                pattern: r"Version: [0-9.]+\n".to_string(),
                replacement: Some("Version: {version}\n".to_string()),
            },
        );
        assert_eq!(
            rewrite(&target, "Theme\nVersion: 1.0\n", "1.1").unwrap(),
            "Theme\nVersion: 1.1\n"
        );
    }

    #[test]
    fn test_rewrite_counts_every_occurrence() {
        let target = VersionedFile::new(
            "defines.php",
            Locator::Constant {
                name: "VERSION".to_string(),
            },
        );
        let content = "define('VERSION', '1.0');\n$cfg = ['VERSION', '1.0'];\n";
        let (_, count) = target.rewrite(content.as_bytes(), "1.1").unwrap().unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_plugin_header_any_case_and_comment_prefix() {
        let target = VersionedFile::new("acme.php", Locator::PluginHeader);
        assert_eq!(
            rewrite(&target, "/*\n * version: 1.0.0\n */\n", "1.1.0").unwrap(),
            "/*\n * version: 1.1.0\n */\n"
        );
        assert_eq!(
            rewrite(&target, "<?php\n// Version: 1.0.0\n", "1.1.0").unwrap(),
            "<?php\n// Version: 1.1.0\n"
        );
        assert_eq!(
            rewrite(&target, "# VERSION: 1.0.0\n", "1.1.0").unwrap(),
            "# VERSION: 1.1.0\n"
        );
    }

    #[test]
    fn test_plugin_header_rewrites_first_line_only() {
        let target = VersionedFile::new("acme.php", Locator::PluginHeader);
        let content = " * Version: 1.0.0\n */\n/**\n * Version: 0.1\n */\n";
        let (rewritten, count) = target.rewrite(content.as_bytes(), "2.0.0").unwrap().unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            rewritten,
            b" * Version: 2.0.0\n */\n/**\n * Version: 0.1\n */\n".to_vec()
        );
    }

    #[test]
    fn test_header_reader_and_writer_agree() {
        let reader = Regex::new(&header_version_pattern()).unwrap();
        let writer = VersionedFile::new("acme.php", Locator::PluginHeader)
            .compile()
            .unwrap();
        for content in [
            " * Version: 1.0.0\n",
            " * version: 1.0.0\n",
            "// Version: 1.0.0\n",
            "#Version:1.0.0\n",
            "Version: 1.0.0\n",
            " * Requires PHP Version: 7.4\n",
            " * Version: \n",
            " * Version: (unreleased)\n",
            "<?php echo 'hello';\n",
        ] {
            let read = reader
                .captures(content.as_bytes())
                .and_then(|caps| caps.get(2))
                .map(|m| !m.as_bytes().is_empty())
                .unwrap_or(false);
            assert_eq!(read, writer.is_match(content.as_bytes()), "{:?}", content);
        }
    }

    #[test]
    fn test_rewrite_preserves_non_utf8_bytes() {
        let target = VersionedFile::new("readme.txt", Locator::StableTag);
        let content = b"Contributors: Jos\xe9\nStable tag: 1.0.0\n";
        let (rewritten, _) = target.rewrite(content, "1.0.1").unwrap().unwrap();
        assert_eq!(rewritten, b"Contributors: Jos\xe9\nStable tag: 1.0.1\n".to_vec());
    }

    #[test]
    fn test_default_targets_order() {
        let mut config = Config::default();
        config.targets.push(TargetConfig {
            path: PathBuf::from("package.json"),
            pattern: r#"("version": ")[^"]+(")"#.to_string(),
            replacement: None,
            stable_only: false,
        });

        let targets = default_targets(Path::new("src"), "acme", &config);
        let paths: Vec<String> = targets
            .iter()
            .map(|t| t.path.display().to_string())
            .collect();

        assert_eq!(
            paths,
            vec![
                "src/acme.php",
                "src/readme.txt",
                "src/acme.php",
                "src/includes.php",
                "src/defines.php",
                "src/src/includes.php",
                "src/src/defines.php",
                "src/package.json",
            ]
        );
        assert_eq!(targets[0].locator, Locator::PluginHeader);
        assert!(targets[1].stable_only);
        assert!(!targets[2].stable_only);
    }
}
