//! Epic Games Launcher source
//!
//! The launcher writes one JSON `.item` file per installed title, plus a
//! launcher-wide `LauncherInstalled.dat` registry used here as fallback
//! when an item carries no install location of its own.

use crate::executable::find_primary_executable;
use ludex_library::{GameCandidate, GameSource, Platform, SourceError, SourceScan, synthetic_id};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "DisplayName")]
    display_name: Option<String>,
    #[serde(rename = "AppName")]
    app_name: Option<String>,
    #[serde(rename = "InstallLocation")]
    install_location: Option<String>,
    #[serde(rename = "LaunchExecutable")]
    launch_executable: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRegistry {
    #[serde(rename = "InstallationList", default)]
    installation_list: Vec<RawInstallation>,
}

#[derive(Debug, Deserialize)]
struct RawInstallation {
    #[serde(rename = "AppName")]
    app_name: Option<String>,
    #[serde(rename = "InstallLocation")]
    install_location: Option<String>,
}

/// One parsed launcher item
#[derive(Debug, Clone, PartialEq)]
pub struct EpicItem {
    pub display_name: String,
    pub app_name: String,
    pub install_location: Option<String>,
    pub launch_executable: Option<String>,
}

/// Parse one `.item` file. A display name / app name pair is required;
/// anything less is not an installed title and yields `None`.
pub fn parse_item(text: &str) -> Option<EpicItem> {
    let raw: RawItem = serde_json::from_str(text).ok()?;
    Some(EpicItem {
        display_name: raw.display_name?,
        app_name: raw.app_name?,
        install_location: raw.install_location,
        launch_executable: raw.launch_executable,
    })
}

/// Parse the `LauncherInstalled.dat` registry into an app-name keyed map.
/// Malformed or missing input yields an empty map.
pub fn installed_locations(text: &str) -> HashMap<String, String> {
    let Ok(raw) = serde_json::from_str::<RawRegistry>(text) else {
        return HashMap::new();
    };
    raw.installation_list
        .into_iter()
        .filter_map(|entry| Some((entry.app_name?, entry.install_location?)))
        .collect()
}

/// Scans the Epic launcher's item manifests for installed titles
pub struct EpicSource {
    manifests_dir: PathBuf,
    installed_registry: PathBuf,
    scan_depth: usize,
}

impl EpicSource {
    pub fn new(
        manifests_dir: impl Into<PathBuf>,
        installed_registry: impl Into<PathBuf>,
        scan_depth: usize,
    ) -> Self {
        Self {
            manifests_dir: manifests_dir.into(),
            installed_registry: installed_registry.into(),
            scan_depth,
        }
    }

    /// Explicit launch executable when it exists on disk, else the resolver.
    fn resolve_executable(&self, item: &EpicItem, install: &Path) -> Option<String> {
        if let Some(launch) = &item.launch_executable {
            let path = install.join(launch);
            if path.is_file() {
                return Some(path.to_string_lossy().into_owned());
            }
            tracing::debug!(
                "{}: declared executable {} not on disk, falling back to scan",
                item.display_name,
                path.display()
            );
        }
        find_primary_executable(install, self.scan_depth).map(|p| p.to_string_lossy().into_owned())
    }
}

impl GameSource for EpicSource {
    fn name(&self) -> &str {
        "epic"
    }

    fn scan(&self) -> Result<SourceScan, SourceError> {
        if !self.manifests_dir.is_dir() {
            return Err(SourceError::MissingRoot(self.manifests_dir.clone()));
        }

        let registry = fs::read_to_string(&self.installed_registry)
            .map(|text| installed_locations(&text))
            .unwrap_or_default();

        let mut scan = SourceScan::default();
        for entry in fs::read_dir(&self.manifests_dir)?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("item") {
                continue;
            }
            scan.found += 1;

            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    scan.errors.push(format!("{}: {}", path.display(), err));
                    continue;
                }
            };
            let Some(item) = parse_item(&text) else {
                scan.errors
                    .push(format!("{}: missing DisplayName/AppName", path.display()));
                continue;
            };

            let install_location = item
                .install_location
                .clone()
                .or_else(|| registry.get(&item.app_name).cloned());
            let executable = install_location
                .as_deref()
                .and_then(|loc| self.resolve_executable(&item, Path::new(loc)));

            scan.candidates.push(GameCandidate {
                id: synthetic_id(Platform::Epic, &item.app_name),
                name: item.display_name,
                executable,
                platform: Platform::Epic,
                epic_app_name: Some(item.app_name),
                install_dir: install_location,
                ..GameCandidate::default()
            });
        }
        Ok(scan)
    }
}
