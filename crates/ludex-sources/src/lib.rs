//! Platform game sources for Ludex
//!
//! Each source discovers installed titles from one platform and turns them
//! into candidates for the reconciliation engine: the Steam store via its
//! quoted-text manifests, the Epic launcher via its JSON item files, and
//! plain GOG-style or unmanaged folders. All parsers are total functions:
//! malformed input yields partial or empty output, never a failure that
//! halts the caller.

mod epic;
mod executable;
mod folders;
mod steam;

pub use epic::{EpicItem, EpicSource, installed_locations, parse_item};
pub use executable::{
    EXECUTABLE_EXTENSIONS, SUPPORT_BINARY_MARKERS, find_primary_executable, is_support_binary,
};
pub use folders::FolderSource;
pub use steam::{
    BLOCKED_APP_IDS, SteamSource, TOOL_NAME_MARKERS, is_tool_name, library_roots, manifest_field,
};
