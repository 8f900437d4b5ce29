//! Host configuration (window, seed, profile, field tunables). Loaded from config.ron at startup.

use field::FieldConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistent host settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_title")]
    pub title: String,
    /// JSON vocabulary profile. Without one the embedded profile for the
    /// field's variant is used.
    #[serde(default)]
    pub profile_path: Option<PathBuf>,
    /// Fixed generation seed. Random when absent.
    #[serde(default)]
    pub seed: Option<u32>,
    /// Scale motion by measured frame time instead of assuming 60 Hz.
    #[serde(default)]
    pub frame_rate_independent: bool,
    /// Show field statistics in the window title.
    #[serde(default = "default_true")]
    pub show_hud: bool,
    #[serde(default)]
    pub field: FieldConfig,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_title() -> String {
    "ZeroPrompt Warp".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            title: default_title(),
            profile_path: None,
            seed: None,
            frame_rate_independent: false,
            show_hud: default_true(),
            field: FieldConfig::default(),
        }
    }
}

impl WarpConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Whether a `config.ron` exists to load from.
    pub fn file_exists() -> bool {
        config_path().is_file()
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::Variant;

    #[test]
    fn empty_document_is_all_defaults() {
        assert_eq!(WarpConfig::parse("()").unwrap(), WarpConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let c = WarpConfig::parse(
            r#"(seed: Some(42), frame_rate_independent: true, field: (variant: Classic, billboard_count: 12))"#,
        )
        .unwrap();
        assert_eq!(c.seed, Some(42));
        assert!(c.frame_rate_independent);
        assert_eq!(c.field.variant, Variant::Classic);
        assert_eq!(c.field.billboard_count, 12);
        assert_eq!(c.field.particle_capacity, 1000);
        assert_eq!(c.window_width, 1280);
        assert!(c.show_hud);
    }

    #[test]
    fn pretty_output_parses_back() {
        let mut c = WarpConfig::default();
        c.profile_path = Some(PathBuf::from("profiles/custom.json"));
        let text = ron::ser::to_string_pretty(&c, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(WarpConfig::parse(&text).unwrap(), c);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let c = WarpConfig::load_from(Path::new("/nonexistent/zeroprompt/config.ron"));
        assert_eq!(c, WarpConfig::default());
    }
}
