//! Configuration management for Ludex
//!
//! TOML-based configuration covering platform roots, scan limits, and the
//! enrichment throttle. Every section defaults sensibly so a missing or
//! partial config file still yields a usable setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Main Ludex configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LudexConfig {
    /// Snapshot location override; defaults to the platform data dir
    pub library_path: Option<PathBuf>,

    #[serde(default)]
    pub steam: SteamConfig,

    #[serde(default)]
    pub epic: EpicConfig,

    #[serde(default)]
    pub gog: GogConfig,

    #[serde(default)]
    pub folders: FoldersConfig,

    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub enrich: EnrichSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteamConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Steam install root; platform default when unset
    pub root: Option<PathBuf>,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: None,
        }
    }
}

impl SteamConfig {
    pub fn root(&self) -> PathBuf {
        if let Some(root) = &self.root {
            return root.clone();
        }
        if cfg!(windows) {
            PathBuf::from("C:\\Program Files (x86)\\Steam")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".steam")
                .join("steam")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory holding the launcher's per-title `.item` files
    pub manifests_dir: Option<PathBuf>,

    /// `LauncherInstalled.dat` registry used as install-location fallback
    pub installed_registry: Option<PathBuf>,
}

impl Default for EpicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            manifests_dir: None,
            installed_registry: None,
        }
    }
}

impl EpicConfig {
    pub fn manifests_dir(&self) -> PathBuf {
        self.manifests_dir.clone().unwrap_or_else(|| {
            PathBuf::from("C:\\ProgramData\\Epic\\EpicGamesLauncher\\Data\\Manifests")
        })
    }

    pub fn installed_registry(&self) -> PathBuf {
        self.installed_registry.clone().unwrap_or_else(|| {
            PathBuf::from("C:\\ProgramData\\Epic\\UnrealEngineLauncher\\LauncherInstalled.dat")
        })
    }
}

/// GOG source is active only when a root is configured
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GogConfig {
    pub root: Option<PathBuf>,
}

/// Unmanaged folder roots scanned as the strict folder source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoldersConfig {
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Maximum directory depth when searching for a game executable
    #[serde(default = "default_scan_depth")]
    pub max_depth: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_depth: default_scan_depth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichSettings {
    /// Maximum records enriched per pass
    #[serde(default = "default_enrich_limit")]
    pub limit: usize,

    /// Delay between consecutive external search calls
    #[serde(default = "default_enrich_delay_ms")]
    pub delay_ms: u64,

    /// Search endpoint override
    pub search_url: Option<String>,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            limit: default_enrich_limit(),
            delay_ms: default_enrich_delay_ms(),
            search_url: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_scan_depth() -> usize {
    3
}

fn default_enrich_limit() -> usize {
    20
}

fn default_enrich_delay_ms() -> u64 {
    1000
}

impl LudexConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from the user config directory, falling back to defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_config_path();
        if path.exists() {
            return Self::load(&path);
        }
        tracing::warn!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ludex")
            .join("config.toml")
    }

    /// Snapshot location: explicit override or the platform data dir
    pub fn library_path(&self) -> PathBuf {
        if let Some(path) = &self.library_path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ludex")
            .join("library.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LudexConfig::default();
        assert!(config.steam.enabled);
        assert!(config.epic.enabled);
        assert_eq!(config.scan.max_depth, 3);
        assert_eq!(config.enrich.limit, 20);
        assert_eq!(config.enrich.delay_ms, 1000);
        assert!(config.gog.root.is_none());
        assert!(config.folders.roots.is_empty());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = LudexConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: LudexConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.scan.max_depth, parsed.scan.max_depth);
        assert_eq!(config.enrich.delay_ms, parsed.enrich.delay_ms);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[steam]
root = "D:\\Steam"

[folders]
roots = ["D:\\Games"]
"#;
        write!(temp_file, "{}", config_content).unwrap();

        let config = LudexConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.steam.root, Some(PathBuf::from("D:\\Steam")));
        assert!(config.steam.enabled);
        assert_eq!(config.folders.roots.len(), 1);
        assert_eq!(config.scan.max_depth, 3);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut config = LudexConfig::default();
        config.gog.root = Some(PathBuf::from("D:\\GOG Games"));
        config.enrich.limit = 5;

        config.save(temp_file.path()).unwrap();
        let loaded = LudexConfig::load(temp_file.path()).unwrap();
        assert_eq!(loaded.gog.root, Some(PathBuf::from("D:\\GOG Games")));
        assert_eq!(loaded.enrich.limit, 5);
    }

    #[test]
    fn test_explicit_library_path_wins() {
        let mut config = LudexConfig::default();
        config.library_path = Some(PathBuf::from("/tmp/custom.json"));
        assert_eq!(config.library_path(), PathBuf::from("/tmp/custom.json"));
    }
}
