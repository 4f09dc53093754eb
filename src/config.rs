//! Gallery configuration.
//!
//! Loaded from a single `config.toml` (path set with `--config`). A missing
//! file means stock defaults. A present file is sparse: its values are merged
//! over the stock defaults, so it only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [gallery]
//! title = "IIIF Gallery"
//!
//! [export]
//! default_name = "combined_manifest"   # used when no export name is given
//! context = "http://iiif.io/api/presentation/3.0/context.json"
//! id = "http://example.org/combined-manifest"
//! label = "Combined Manifest"
//!
//! [http]
//! user_agent = "manifest-gal/<version>"
//! # timeout_secs = 30                  # omit for no timeout
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"
//! border = "#e0e0e0"
//! link = "#1a4f8b"
//! link_hover = "#0b2e55"
//!
//! [colors.dark]
//! background = "#121212"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#8ab4f8"
//! link_hover = "#c6dafc"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Gallery page settings.
    pub gallery: GalleryConfig,
    /// Combined manifest export settings.
    pub export: ExportConfig,
    /// Manifest fetching settings.
    pub http: HttpConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate values that would otherwise fail later, far from the config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.default_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.default_name must not be empty".into(),
            ));
        }
        if self.export.id.trim().is_empty() {
            return Err(ConfigError::Validation("export.id must not be empty".into()));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "http.user_agent must not be empty".into(),
            ));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be positive (omit it for no timeout)".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Page title of the generated gallery.
    pub title: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "IIIF Gallery".to_string(),
        }
    }
}

/// Fixed parts of the combined manifest written on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// File name (without `.json`) used when the caller gives a blank name.
    pub default_name: String,
    /// `@context` of the combined document.
    pub context: String,
    /// `id` of the combined document.
    pub id: String,
    /// English label of the combined document.
    pub label: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_name: "combined_manifest".to_string(),
            context: "http://iiif.io/api/presentation/3.0/context.json".to_string(),
            id: "http://example.org/combined-manifest".to_string(),
            label: "Combined Manifest".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// `User-Agent` header sent with manifest requests.
    pub user_agent: String,
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("manifest-gal/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Card detail lines and the page subtitle.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#1a4f8b".to_string(),
            link_hover: "#0b2e55".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#8ab4f8".to_string(),
            link_hover: "#c6dafc".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Stock defaults as a TOML table, the base layer user values merge onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge `overlay` (if any) onto stock defaults, deserialize, and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`; a missing file yields stock defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(overlay))
}

/// A fully commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# manifest-gal configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Gallery page
# ---------------------------------------------------------------------------
[gallery]
title = "IIIF Gallery"

# ---------------------------------------------------------------------------
# Combined manifest export
# ---------------------------------------------------------------------------
[export]
# File name (without .json) used when no export name is given.
default_name = "combined_manifest"
# Fixed header of the combined document.
context = "http://iiif.io/api/presentation/3.0/context.json"
id = "http://example.org/combined-manifest"
label = "Combined Manifest"

# ---------------------------------------------------------------------------
# Manifest fetching
# ---------------------------------------------------------------------------
[http]
# user_agent = "manifest-gal/<version>"
# Whole-request timeout in seconds. Omit to wait indefinitely.
# timeout_secs = 30

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"    # Card details
border = "#e0e0e0"
link = "#1a4f8b"
link_hover = "#0b2e55"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#8ab4f8"
link_hover = "#c6dafc"
"##
}

/// CSS custom properties for both color schemes.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let vars = |scheme: &ColorScheme, indent: &str| {
        format!(
            "{indent}--color-bg: {};\n{indent}--color-text: {};\n{indent}--color-text-muted: {};\n\
             {indent}--color-border: {};\n{indent}--color-link: {};\n{indent}--color-link-hover: {};",
            scheme.background,
            scheme.text,
            scheme.text_muted,
            scheme.border,
            scheme.link,
            scheme.link_hover,
        )
    };
    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        vars(&colors.light, "    "),
        vars(&colors.dark, "        "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_combined_manifest_literals() {
        let config = SiteConfig::default();
        assert_eq!(config.export.default_name, "combined_manifest");
        assert_eq!(
            config.export.context,
            "http://iiif.io/api/presentation/3.0/context.json"
        );
        assert_eq!(config.export.id, "http://example.org/combined-manifest");
        assert_eq!(config.export.label, "Combined Manifest");
        assert_eq!(config.http.timeout_secs, None);
        assert!(config.http.user_agent.starts_with("manifest-gal/"));
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r##"
[colors.dark]
background = "#000000"
"##,
        )
        .unwrap();
        assert_eq!(config.colors.dark.background, "#000000");
        assert_eq!(config.colors.dark.text, "#eeeeee");
        assert_eq!(config.export.default_name, "combined_manifest");
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[export]\nfilename = \"x\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.gallery.title, "IIIF Gallery");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[gallery]
title = "Harbor Maps"

[http]
timeout_secs = 20
"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.gallery.title, "Harbor Maps");
        assert_eq!(config.http.timeout_secs, Some(20));
        assert!(config.http.user_agent.starts_with("manifest-gal/"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[export]\ndefault_name = \"  \"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));

        fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.export, defaults.export);
        assert_eq!(config.gallery.title, defaults.gallery.title);
        assert_eq!(config.colors.dark.link, defaults.colors.dark.link);
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n[b]\nz = 4\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
        assert_eq!(merged["b"]["z"].as_integer(), Some(4));
    }

    // =========================================================================
    // CSS generation
    // =========================================================================

    #[test]
    fn color_css_has_both_schemes() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#fafafa".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #fafafa;"));
        assert!(css.contains("--color-bg: #121212;"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains("--color-link-hover:"));
    }
}
