//! Configuration file support
//!
//! Loads settings from `<config dir>/ty2ini-edit/config.toml`
//! (`~/.config/ty2ini-edit/config.toml` on Linux) or the file given with
//! `--config`. Every key is optional.
//!
//! Example:
//! ```text
//! line-numbers = true
//! tab-width = 4
//! data-dir = "/opt/ty2/Data"
//!
//! [completion]
//! min-fragment = 2
//! max-width = 40
//! max-height = 10
//!
//! [colors]
//! keyword = "bright-magenta"
//!
//! [toolchain]
//! import = "ty2ini import {input}"
//! compile = "ty2ini compile {input} {output}"
//! repack = "rkvtool repack {input} {archive}"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::completion::PopupBounds;
use crate::error::Result;
use crate::syntax::{Color, StyleCategory, Theme};

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Whether to show line numbers
    pub line_numbers: bool,
    /// Tab width for display and tab insertion
    pub tab_width: usize,
    /// Whether highlighting starts enabled
    pub syntax_highlighting: bool,
    /// Directory holding the identifier word lists
    pub data_dir: Option<PathBuf>,
    pub completion: CompletionConfig,
    pub colors: ColorConfig,
    pub toolchain: ToolchainConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_numbers: false,
            tab_width: 4,
            syntax_highlighting: true,
            data_dir: None,
            completion: CompletionConfig::default(),
            colors: ColorConfig::default(),
            toolchain: ToolchainConfig::default(),
        }
    }
}

/// Completion popup settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompletionConfig {
    /// Characters typed before the popup opens by itself
    pub min_fragment: usize,
    /// Popup width cap in columns
    pub max_width: usize,
    /// Popup height cap in rows
    pub max_height: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        let bounds = PopupBounds::default();
        Self {
            min_fragment: crate::completion::MIN_FRAGMENT_LEN,
            max_width: bounds.max_width,
            max_height: bounds.max_height,
        }
    }
}

impl CompletionConfig {
    pub fn bounds(&self) -> PopupBounds {
        PopupBounds {
            max_width: self.max_width,
            max_height: self.max_height,
        }
    }
}

/// Per-category color overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ColorConfig {
    pub number: Option<String>,
    pub keyword: Option<String>,
    pub section_name: Option<String>,
    pub field_name: Option<String>,
    pub field_value: Option<String>,
}

impl ColorConfig {
    /// Theme with the configured colors applied over the defaults.
    /// Unknown color names are ignored.
    pub fn theme(&self) -> Theme {
        let overrides = [
            (StyleCategory::Number, &self.number),
            (StyleCategory::Keyword, &self.keyword),
            (StyleCategory::SectionName, &self.section_name),
            (StyleCategory::FieldName, &self.field_name),
            (StyleCategory::FieldValue, &self.field_value),
        ];

        let mut theme = Theme::default();
        for (category, name) in overrides {
            let Some(name) = name else { continue };
            match Color::from_name(name) {
                Some(color) => theme = theme.with_color(category, color),
                None => warn!(category = ?category, color = %name, "unknown color name"),
            }
        }
        theme
    }
}

/// Command templates for the external toolchain
///
/// Placeholders: `{input}`, `{output}`, `{archive}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainConfig {
    /// Binary container → text on stdout
    pub import: Option<String>,
    /// Text file → compiled artifact
    pub compile: Option<String>,
    /// Compiled artifact → archive
    pub repack: Option<String>,
    /// Extension of the compiled artifact made while exporting an archive
    pub intermediate_extension: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            import: None,
            compile: None,
            repack: None,
            intermediate_extension: "bni".to_string(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ty2ini-edit").join("config.toml"))
    }

    /// Load configuration, falling back to defaults.
    ///
    /// A missing file is silent; a malformed one is logged.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(path) => path,
            None => return Self::default(),
        };

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                if explicit.is_some() {
                    warn!(path = %path.display(), error = %e, "cannot read config file");
                }
                return Self::default();
            }
        };

        match Self::parse(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }
        }
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.clamp();
        Ok(config)
    }

    /// Keep numeric settings within usable ranges
    fn clamp(&mut self) {
        self.tab_width = self.tab_width.clamp(1, 16);
        self.completion.max_width = self.completion.max_width.max(10);
        self.completion.max_height = self.completion.max_height.max(3);
        let ext = self.toolchain.intermediate_extension.trim_start_matches('.');
        self.toolchain.intermediate_extension = ext.to_string();
    }

    /// Word list directory: CLI override, then config, then `./Data`
    pub fn data_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(crate::wordlist::WordLists::default_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
line-numbers = true
tab-width = 2
data-dir = "/games/ty2/Data"

[completion]
min-fragment = 3
max-height = 6

[toolchain]
import = "ty2ini import {input}"
intermediate-extension = ".bin"
        "#;

        let config = Config::parse(contents).unwrap();
        assert!(config.line_numbers);
        assert_eq!(config.tab_width, 2);
        assert_eq!(config.data_dir, Some(PathBuf::from("/games/ty2/Data")));
        assert_eq!(config.completion.min_fragment, 3);
        assert_eq!(config.completion.max_height, 6);
        assert_eq!(config.completion.max_width, 40);
        assert_eq!(config.toolchain.import.as_deref(), Some("ty2ini import {input}"));
        assert_eq!(config.toolchain.compile, None);
        assert_eq!(config.toolchain.intermediate_extension, "bin");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_values_are_clamped() {
        let config = Config::parse("tab-width = 100\n[completion]\nmax-width = 1\nmax-height = 0\n").unwrap();
        assert_eq!(config.tab_width, 16);
        assert_eq!(config.completion.max_width, 10);
        assert_eq!(config.completion.max_height, 3);
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(Config::parse("tab-width = \"wide\"").is_err());
        assert!(Config::parse("[completion").is_err());
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "line-numbers = maybe").unwrap();
        assert_eq!(Config::load(Some(&bad)), Config::default());

        let missing = dir.path().join("missing.toml");
        assert_eq!(Config::load(Some(&missing)), Config::default());

        let good = dir.path().join("good.toml");
        fs::write(&good, "line-numbers = true").unwrap();
        assert!(Config::load(Some(&good)).line_numbers);
    }

    #[test]
    fn test_color_overrides() {
        let config = Config::parse("[colors]\nnumber = \"red\"\nkeyword = \"plaid\"\n").unwrap();
        let theme = config.colors.theme();
        assert_eq!(theme.style_for(StyleCategory::Number).fg, Color::Red);
        assert_eq!(
            theme.style_for(StyleCategory::Keyword),
            StyleCategory::Keyword.default_style()
        );
    }

    #[test]
    fn test_data_dir_precedence() {
        let mut config = Config::default();
        assert_eq!(config.data_dir(None), PathBuf::from("./Data"));
        config.data_dir = Some(PathBuf::from("/cfg"));
        assert_eq!(config.data_dir(None), PathBuf::from("/cfg"));
        assert_eq!(config.data_dir(Some(Path::new("/cli"))), PathBuf::from("/cli"));
    }
}
