//! Stable identity assignment for sources without a canonical id
//!
//! Steam manifests carry a numeric appid which is used as the record id
//! directly. Launcher items and plain folders have no platform id, so their
//! identity is synthesized from a platform-prefixed key. The synthesis must
//! be deterministic across repeated scans or re-imports would duplicate
//! every record.

use crate::Platform;

/// Derive a negative, deterministic identity from a platform-prefixed key.
///
/// Rolling 31-multiplier byte hash over `"<platform>:<key>"`, folded to a
/// positive i64 magnitude and negated. Not collision-resistant: two
/// distinct keys may hash alike, and reconciliation then treats them as
/// one record.
pub fn synthetic_id(platform: Platform, key: &str) -> i64 {
    let seed = format!("{}:{}", platform.as_str(), key);
    let mut hash: u64 = 0;
    for byte in seed.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(u64::from(byte));
    }
    // Mask the sign bit, clamp away zero so the id stays negative.
    let magnitude = (hash & (i64::MAX as u64)).max(1) as i64;
    -magnitude
}
