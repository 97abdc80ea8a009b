//! Steam canonical-store source
//!
//! Steam describes each installed title in a quoted key/value text manifest
//! (`appmanifest_<appid>.acf`) under `steamapps/`, and lists extra library
//! volumes in `steamapps/libraryfolders.vdf`. Both formats are scanned with
//! a line-level quoted-pair extractor; missing fields yield `None`, never
//! an error.

use crate::executable::find_primary_executable;
use ludex_library::{GameCandidate, GameSource, Platform, SourceError, SourceScan};
use std::fs;
use std::path::{Path, PathBuf};

/// App ids that are never games (Steamworks Common Redistributables)
pub const BLOCKED_APP_IDS: &[i64] = &[228980];

/// Case-insensitive name substrings marking tools rather than games
pub const TOOL_NAME_MARKERS: &[&str] = &[
    "wallpaper engine",
    "driver booster",
    "controller",
    "soundtrack",
    "editor",
    "sdk",
];

/// True when a manifest name matches the tool-name heuristic.
pub fn is_tool_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    TOOL_NAME_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Extract the first `"key" "value"` pair on a line, if any.
fn quoted_pair(line: &str) -> Option<(String, String)> {
    let mut parts = Vec::with_capacity(2);
    let mut rest = line;
    while parts.len() < 2 {
        let start = rest.find('"')?;
        let end = rest[start + 1..].find('"')? + start + 1;
        parts.push(rest[start + 1..end].to_string());
        rest = &rest[end + 1..];
    }
    let value = parts.pop()?;
    let key = parts.pop()?;
    Some((key, value))
}

/// Pull one root field (`appid`, `name`, `installdir`) out of manifest text.
pub fn manifest_field(text: &str, key: &str) -> Option<String> {
    for line in text.lines() {
        if let Some((k, v)) = quoted_pair(line)
            && k.eq_ignore_ascii_case(key)
        {
            return Some(v);
        }
    }
    None
}

/// Collect every library root from a `libraryfolders.vdf` descriptor.
///
/// Two schemes coexist in the wild: the modern one keys each root under
/// `"path"`, the legacy one keys roots by bare index (`"1" "D:\\Games"`).
/// Legacy values are accepted only when they look like a path, which keeps
/// the numeric appid/size pairs of the modern `"apps"` blocks out of the
/// result. Escaped separators are collapsed and duplicates dropped.
pub fn library_roots(text: &str) -> Vec<String> {
    let mut roots = Vec::new();
    for line in text.lines() {
        let Some((key, value)) = quoted_pair(line) else {
            continue;
        };
        let is_modern = key.eq_ignore_ascii_case("path");
        let is_legacy = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_digit())
            && looks_like_path(&value);
        if !is_modern && !is_legacy {
            continue;
        }
        let root = value.replace("\\\\", "\\");
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

fn looks_like_path(value: &str) -> bool {
    value.contains('/') || value.contains('\\') || value.contains(':')
}

/// Scans Steam library volumes for installed titles
pub struct SteamSource {
    root: PathBuf,
    scan_depth: usize,
}

impl SteamSource {
    pub fn new(root: impl Into<PathBuf>, scan_depth: usize) -> Self {
        Self {
            root: root.into(),
            scan_depth,
        }
    }

    /// The configured root plus every root listed in libraryfolders.vdf.
    fn all_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.root.clone()];
        let descriptor = self.root.join("steamapps").join("libraryfolders.vdf");
        if let Ok(text) = fs::read_to_string(&descriptor) {
            for root in library_roots(&text) {
                let root = PathBuf::from(root);
                if !roots.contains(&root) {
                    roots.push(root);
                }
            }
        }
        roots
    }

    fn scan_root(&self, root: &Path, scan: &mut SourceScan) {
        let steamapps = root.join("steamapps");
        let Ok(entries) = fs::read_dir(&steamapps) else {
            // A listed volume may be unplugged; treat it as empty.
            tracing::debug!("Cannot read {}", steamapps.display());
            return;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !file_name.starts_with("appmanifest_") || !file_name.ends_with(".acf") {
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

            let Some(appid) = manifest_field(&text, "appid").and_then(|v| v.parse::<i64>().ok())
            else {
                scan.errors.push(format!("{}: no appid", path.display()));
                continue;
            };
            let Some(name) = manifest_field(&text, "name") else {
                scan.errors.push(format!("{}: no name", path.display()));
                continue;
            };

            if BLOCKED_APP_IDS.contains(&appid) || is_tool_name(&name) {
                tracing::debug!("Skipping non-game entry {} ({})", name, appid);
                continue;
            }

            let install_dir = manifest_field(&text, "installdir")
                .map(|dir| steamapps.join("common").join(dir));
            let executable = install_dir
                .as_deref()
                .and_then(|dir| find_primary_executable(dir, self.scan_depth))
                .map(|p| p.to_string_lossy().into_owned());

            scan.candidates.push(GameCandidate {
                id: appid,
                name,
                executable,
                platform: Platform::Steam,
                steam_app_id: Some(appid),
                install_dir: install_dir.map(|p| p.to_string_lossy().into_owned()),
                ..GameCandidate::default()
            });
        }
    }
}

impl GameSource for SteamSource {
    fn name(&self) -> &str {
        "steam"
    }

    fn scan(&self) -> Result<SourceScan, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::MissingRoot(self.root.clone()));
        }

        let mut scan = SourceScan::default();
        for root in self.all_roots() {
            self.scan_root(&root, &mut scan);
        }
        Ok(scan)
    }
}
