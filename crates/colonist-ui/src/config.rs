//! User configuration management
//!
//! Handles saving and loading user preferences: display scale, language,
//! logging and which panels are shown.

use crate::Result;
use colonist_core::LogConfig;
use colonist_media::LibraryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of recently used resource directories remembered.
const MAX_RECENT_RESOURCE_DIRS: usize = 10;

/// User configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Preferred language code (e.g., "en", "de")
    pub language: String,
    /// Scale applied to every image the library resolves
    #[serde(default = "default_scale")]
    pub scale_factor: f32,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
    /// Image library tuning
    #[serde(default)]
    pub library: LibraryConfig,
    /// Resource directories opened recently
    #[serde(default)]
    pub recent_resource_dirs: Vec<String>,

    // === Panel Visibility ===
    /// Open the settlement report when a native settlement is clicked
    #[serde(default = "default_true")]
    pub show_settlement_reports: bool,
    /// Draw unit labels at half size in crowded panels
    #[serde(default)]
    pub small_unit_labels: bool,
}

fn default_true() -> bool {
    true
}

fn default_scale() -> f32 {
    1.0
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            scale_factor: default_scale(),
            log: LogConfig::default(),
            library: LibraryConfig::default(),
            recent_resource_dirs: Vec::new(),
            show_settlement_reports: true,
            small_unit_labels: false,
        }
    }
}

impl UserConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("Colonist");
            p.push("config.json");
            p
        })
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Load configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    /// Save configuration to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Update the scale factor and save
    pub fn set_scale_factor(&mut self, scale: f32) {
        if colonist_core::check_scale(scale).is_err() {
            tracing::warn!("Rejecting scale factor {}", scale);
            return;
        }
        self.scale_factor = scale;
        if let Err(e) = self.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Add a resource directory to the recent list
    pub fn add_recent_resource_dir(&mut self, dir: &str) {
        self.recent_resource_dirs.retain(|d| d != dir);
        self.recent_resource_dirs.insert(0, dir.to_string());
        self.recent_resource_dirs.truncate(MAX_RECENT_RESOURCE_DIRS);
        if let Err(e) = self.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UserConfig::default();
        assert_eq!(config.language, "en");
        assert_eq!(config.scale_factor, 1.0);
        assert!(config.show_settlement_reports);
        assert!(!config.small_unit_labels);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: UserConfig = serde_json::from_str(r#"{ "language": "de" }"#).unwrap();
        assert_eq!(config.language, "de");
        assert_eq!(config.scale_factor, 1.0);
        assert!(config.show_settlement_reports);
        assert_eq!(config.library, LibraryConfig::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = UserConfig::default();
        config.scale_factor = 2.0;
        config.small_unit_labels = true;
        config.library.derived_cache_capacity = 64;
        config.save_to(&path).unwrap();

        let loaded = UserConfig::load_from(&path).unwrap();
        assert_eq!(loaded.scale_factor, 2.0);
        assert!(loaded.small_unit_labels);
        assert_eq!(loaded.library.derived_cache_capacity, 64);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            UserConfig::load_from(&dir.path().join("none.json")),
            Err(crate::UiError::Io(_))
        ));
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{").unwrap();
        assert!(matches!(
            UserConfig::load_from(&broken),
            Err(crate::UiError::Config(_))
        ));
    }
}
