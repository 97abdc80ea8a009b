//! Heuristic discovery of the primary game binary inside an install tree

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions considered launchable
pub const EXECUTABLE_EXTENSIONS: &[&str] = &["exe"];

/// Case-insensitive filename substrings marking installer/support binaries
pub const SUPPORT_BINARY_MARKERS: &[&str] = &[
    "unins",
    "setup",
    "redist",
    "vcredist",
    "dxsetup",
    "crashhandler",
    "crash-handler",
    "crashreport",
    "prereq",
];

/// True when the filename marks an installer or support binary rather than
/// the game itself.
pub fn is_support_binary(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    SUPPORT_BINARY_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Find the most likely game binary under `root`.
///
/// Breadth-first walk bounded by `max_depth` (keeps deep installs from
/// dominating scan time), filtered by extension and the support-binary
/// denylist, ranked by file size descending on the heuristic that the
/// primary binary is the largest. Unreadable directories are treated as
/// empty, not as errors.
pub fn find_primary_executable(root: &Path, max_depth: usize) -> Option<PathBuf> {
    let mut best: Option<(PathBuf, u64)> = None;
    let mut queue = VecDeque::new();
    queue.push_back((root.to_path_buf(), 0usize));

    while let Some((dir, depth)) = queue.pop_front() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };

        for entry in entries.flatten() {
            let path = entry.path();

            if path.is_dir() {
                if depth < max_depth {
                    queue.push_back((path, depth + 1));
                }
                continue;
            }

            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !EXECUTABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if is_support_binary(name) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if best.as_ref().is_none_or(|(_, best_size)| size > *best_size) {
                best = Some((path, size));
            }
        }
    }

    best.map(|(path, _)| path)
}
