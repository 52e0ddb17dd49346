//! Unique identifier generation.

use rand::RngCore;

/// Generate a fresh 128-bit identifier as lowercase hex.
///
/// Used to tag voting results; uniqueness matters, ordering does not.
pub fn unique_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let mut out = String::with_capacity(32);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
