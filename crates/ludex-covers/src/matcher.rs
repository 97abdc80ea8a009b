//! Name normalization and cover-candidate selection

use crate::SearchHit;

/// Normalize a title for comparison: lowercase, strip the punctuation the
/// stores disagree on (`: - _ , .`), collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let stripped: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '_' | ',' | '.'))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Select the best cover candidate for `target`. First rule wins:
/// exact normalized match, then prefix in either direction, then the first
/// hit in result order that carries any cover at all.
pub fn pick_cover<'a>(target: &str, hits: &'a [SearchHit]) -> Option<&'a SearchHit> {
    let target_norm = normalize_name(target);

    if let Some(hit) = hits
        .iter()
        .find(|h| h.cover.is_some() && normalize_name(&h.name) == target_norm)
    {
        return Some(hit);
    }

    if let Some(hit) = hits.iter().find(|h| {
        if h.cover.is_none() {
            return false;
        }
        let hit_norm = normalize_name(&h.name);
        hit_norm.starts_with(&target_norm) || target_norm.starts_with(&hit_norm)
    }) {
        return Some(hit);
    }

    hits.iter().find(|h| h.cover.is_some())
}
