//! User settings
//!
//! Manages defaults from ~/.config/fontparts/settings.json

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::memory::DEFAULT_LAYER_NAME;

/// User configuration from ~/.config/fontparts/settings.json
///
/// Every field is optional; missing fields fall back to the built-in
/// defaults, and command line flags override both.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Name of the layer new fonts start with
    pub default_layer_name: Option<String>,
    /// Advance width of new glyphs
    pub default_glyph_width: Option<f64>,
    /// Advance height of new glyphs
    pub default_glyph_height: Option<f64>,
    /// Units per em of new fonts
    pub units_per_em: Option<f64>,
    /// `tracing` filter directive, e.g. "info" or "fontparts=debug"
    pub log_filter: Option<String>,
}

impl Settings {
    /// Get the path to the fontparts config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("fontparts")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return None;
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(settings)
                }
                Err(e) => {
                    warn!("Failed to parse settings.json: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read settings.json: {}", e);
                None
            }
        }
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// The settings with every default written out
    pub fn with_defaults() -> Self {
        Self {
            default_layer_name: Some(DEFAULT_LAYER_NAME.to_string()),
            default_glyph_width: Some(0.0),
            default_glyph_height: Some(0.0),
            units_per_em: Some(1000.0),
            log_filter: Some("info".to_string()),
        }
    }

    pub fn default_layer_name(&self) -> &str {
        self.default_layer_name.as_deref().unwrap_or(DEFAULT_LAYER_NAME)
    }

    pub fn default_glyph_width(&self) -> f64 {
        self.default_glyph_width.unwrap_or(0.0)
    }

    pub fn default_glyph_height(&self) -> f64 {
        self.default_glyph_height.unwrap_or(0.0)
    }

    pub fn units_per_em(&self) -> f64 {
        self.units_per_em.unwrap_or(1000.0)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("info")
    }

    /// Initialize the user configuration directory
    ///
    /// Creates ~/.config/fontparts with a logs/ directory and a
    /// settings.json holding the defaults.
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        let config_dir = Self::config_dir();
        fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = crate::logging::logs_dir();
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = Self::config_path();
        if !settings_path.exists() {
            Self::with_defaults().save()?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"units_per_em": 2048}"#).unwrap();
        assert_eq!(settings.units_per_em(), 2048.0);
        assert_eq!(settings.default_layer_name(), "public.default");
        assert_eq!(settings.log_filter(), "info");
    }

    #[test]
    fn test_defaults_round_trip_through_json() {
        let settings = Settings::with_defaults();
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_config_path_ends_with_settings_file() {
        let path = Settings::config_path();
        assert!(path.ends_with("fontparts/settings.json"));
    }
}
