//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml          # Overrides stock defaults (optional)
//! ├── categories.toml
//! ├── posts/
//! └── pages/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Aknazar Textile"
//! default_locale = "en"
//! locales = ["en", "ru", "uz"]
//!
//! [blog]
//! related_limit = 3         # Related posts under an article
//! latest_on_home = 3        # Latest posts on the home page
//!
//! [reveal]
//! threshold = 0.1           # Visible fraction before a section reveals
//! margin_px = 50.0          # Viewport grown by this much on every side
//!
//! [carousel]
//! interval_ms = 3000        # Fabric carousel period
//!
//! [colors.light]
//! background = "#F5F3EE"
//! surface = "#ffffff"
//! text = "#2F463E"
//! text_muted = "#5f6b66"
//! accent = "#2F463E"
//! border = "#e2ddd3"
//!
//! [colors.dark]
//! background = "#18201c"
//! ...
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::i18n::Locale;
use crate::reveal::{CarouselTimer, RevealOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity and languages.
    pub site: SiteSection,
    /// Blog listing settings.
    pub blog: BlogConfig,
    /// Scroll reveal tuning, emitted onto every page.
    pub reveal: RevealConfig,
    /// Hero carousel timing.
    pub carousel: CarouselConfig,
    /// Footer contact block.
    pub contact: ContactConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        if self.site.locales.is_empty() {
            return Err(ConfigError::Validation(
                "site.locales must not be empty".into(),
            ));
        }
        if !self.site.locales.contains(&self.site.default_locale) {
            return Err(ConfigError::Validation(format!(
                "site.default_locale \"{}\" must be listed in site.locales",
                self.site.default_locale
            )));
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::Validation(
                "reveal.threshold must be between 0 and 1".into(),
            ));
        }
        if !self.reveal.margin_px.is_finite() || self.reveal.margin_px < 0.0 {
            return Err(ConfigError::Validation(
                "reveal.margin_px must be zero or positive".into(),
            ));
        }
        if self.carousel.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "carousel.interval_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Locales in configured order with the default first.
    pub fn ordered_locales(&self) -> Vec<Locale> {
        let mut ordered = vec![self.site.default_locale];
        for locale in &self.site.locales {
            if !ordered.contains(locale) {
                ordered.push(*locale);
            }
        }
        ordered
    }
}

/// Site identity and language settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Brand name shown in the header, footer and page titles.
    pub name: String,
    /// Locale served at the site root.
    pub default_locale: Locale,
    /// Locales to render. Each gets its own `dist/<code>/` tree.
    pub locales: Vec<Locale>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: "Aknazar Textile".to_string(),
            default_locale: Locale::En,
            locales: Locale::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Maximum related posts shown under an article.
    pub related_limit: usize,
    /// Latest posts listed on the home page.
    pub latest_on_home: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            related_limit: crate::blog::DEFAULT_RELATED_LIMIT,
            latest_on_home: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Visible fraction (0-1) before a section counts as seen.
    pub threshold: f64,
    /// Pixels the viewport is grown by on every side.
    pub margin_px: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        let options = RevealOptions::default();
        Self {
            threshold: options.threshold,
            margin_px: options.margin_px,
        }
    }
}

impl RevealConfig {
    pub fn options(&self) -> RevealOptions {
        RevealOptions {
            threshold: self.threshold,
            margin_px: self.margin_px,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Milliseconds between automatic advances.
    pub interval_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: crate::reveal::DEFAULT_CAROUSEL_INTERVAL.as_millis() as u64,
        }
    }
}

impl CarouselConfig {
    pub fn timer(&self) -> CarouselTimer {
        CarouselTimer::new(Duration::from_millis(self.interval_ms))
    }
}

/// Contact details rendered in the footer. Empty fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email: "info@aknazartextile.uz".to_string(),
            phone: "+998 71 123 45 67".to_string(),
            address: "Tashkent, Uzbekistan".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
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

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Cards and header background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Secondary text (dates, read time, captions).
    pub text_muted: String,
    /// Brand color for buttons, links and highlights.
    pub accent: String,
    /// Border color.
    pub border: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#F5F3EE".to_string(),
            surface: "#ffffff".to_string(),
            text: "#2F463E".to_string(),
            text_muted: "#5f6b66".to_string(),
            accent: "#2F463E".to_string(),
            border: "#e2ddd3".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#18201c".to_string(),
            surface: "#222c27".to_string(),
            text: "#F5F3EE".to_string(),
            text_muted: "#a9b3ad".to_string(),
            accent: "#c9b98f".to_string(),
            border: "#34403a".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    if overlay.is_none() {
        log::debug!("no config.toml in {}, using defaults", root.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Textile Site Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Brand name used in the header, footer and <title>.
name = "Aknazar Textile"

# Locale served at the site root. Must appear in `locales`.
default_locale = "en"

# Locales to render. Supported: "en", "ru", "uz".
locales = ["en", "ru", "uz"]

# ---------------------------------------------------------------------------
# Blog
# ---------------------------------------------------------------------------
[blog]
# Related articles shown under each post (same category or shared tag).
related_limit = 3

# Latest articles listed on the home page.
latest_on_home = 3

# ---------------------------------------------------------------------------
# Scroll reveal
# ---------------------------------------------------------------------------
[reveal]
# Fraction of a section (0-1) that must be visible before it fades in.
threshold = 0.1

# Pixels the viewport is grown by on every side, so sections start
# revealing just before they scroll into view.
margin_px = 50.0

# ---------------------------------------------------------------------------
# Hero fabric carousel
# ---------------------------------------------------------------------------
[carousel]
# Milliseconds between automatic advances.
interval_ms = 3000

# ---------------------------------------------------------------------------
# Footer contact block (empty values are hidden)
# ---------------------------------------------------------------------------
[contact]
email = "info@aknazartextile.uz"
phone = "+998 71 123 45 67"
address = "Tashkent, Uzbekistan"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#F5F3EE"
surface = "#ffffff"
text = "#2F463E"
text_muted = "#5f6b66"    # Dates, read time, captions
accent = "#2F463E"        # Buttons, links, highlights
border = "#e2ddd3"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#18201c"
surface = "#222c27"
text = "#F5F3EE"
text_muted = "#a9b3ad"
accent = "#c9b98f"
border = "#34403a"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-surface: {light_surface};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-accent: {light_accent};
    --color-border: {light_border};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-surface: {dark_surface};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-accent: {dark_accent};
        --color-border: {dark_border};
    }}
}}"#,
        light_bg = colors.light.background,
        light_surface = colors.light.surface,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_accent = colors.light.accent,
        light_border = colors.light.border,
        dark_bg = colors.dark.background,
        dark_surface = colors.dark.surface,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_accent = colors.dark.accent,
        dark_border = colors.dark.border,
    )
}
