//! Record model shared by the sources, the reconciler, and the snapshot

use serde::{Deserialize, Serialize};

/// Owning platform of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Steam,
    Epic,
    Gog,
    /// Unmanaged folders and manual additions
    #[default]
    None,
}

impl Platform {
    /// Platform as the prefix used for synthetic identity keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Steam => "steam",
            Platform::Epic => "epic",
            Platform::Gog => "gog",
            Platform::None => "none",
        }
    }
}

/// One title in the library
///
/// `id` is positive when it is the owning platform's canonical identifier
/// (Steam appid) and negative when synthesized locally for sources without
/// a stable id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub executable: Option<String>,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub steam_app_id: Option<i64>,
    #[serde(default)]
    pub epic_app_name: Option<String>,
    #[serde(default)]
    pub gog_game_id: Option<String>,
    #[serde(default)]
    pub install_dir: Option<String>,
    /// Never null in a well-formed library; older snapshots may lack the
    /// field, in which case the store backfills it from `name` on load.
    #[serde(default)]
    pub sort_key: String,
    #[serde(default)]
    pub is_platinum: bool,
}

/// Scanner-side field set produced by a platform source
///
/// Same shape as [`GameRecord`] minus completion state; absent fields mean
/// "the scan learned nothing about this" and never clobber user edits on
/// merge (see `Reconciler::upsert`).
#[derive(Debug, Clone, Default)]
pub struct GameCandidate {
    pub id: i64,
    pub name: String,
    pub cover: Option<String>,
    pub cover_url: Option<String>,
    pub executable: Option<String>,
    pub platform: Platform,
    pub steam_app_id: Option<i64>,
    pub epic_app_name: Option<String>,
    pub gog_game_id: Option<String>,
    pub install_dir: Option<String>,
    pub sort_key: Option<String>,
}

/// The full persisted state: two disjoint ordered collections
///
/// Invariant: an id appears in exactly one collection across the whole
/// library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub active: Vec<GameRecord>,
    #[serde(default)]
    pub completed: Vec<GameRecord>,
}

impl Library {
    /// Look up a record by id in either collection
    pub fn find(&self, id: i64) -> Option<&GameRecord> {
        self.active
            .iter()
            .chain(self.completed.iter())
            .find(|g| g.id == id)
    }

    /// Iterate every record, active first
    pub fn iter_all(&self) -> impl Iterator<Item = &GameRecord> {
        self.active.iter().chain(self.completed.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}

/// Per-source outcome of one import pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub found: usize,
    pub imported: usize,
    pub errors: Vec<String>,
}

/// Outcome of a full import pass across all sources
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub sources: Vec<SourceReport>,
    pub games_count: usize,
    pub completed_count: usize,
}
