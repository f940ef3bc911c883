//! Storage-safe keys derived from task identifiers.
//!
//! Task ids are free-form, but document keys end up as file names. Every
//! read, write and delete goes through [`sanitize_key`], so one logical id
//! always maps to one physical key.
//!
//! The transform is lossy: ids that differ only in illegal characters map to
//! the same key and silently share one document. Callers must pick ids that
//! stay distinct after sanitization.
//!
//! Collection names become a directory under the store root, so they are
//! checked with [`validate_collection`] instead of being rewritten.

use std::borrow::Cow;

use crate::error::{Result, TaskrecError};

/// Characters that may not appear in a storage key.
pub const ILLEGAL_KEY_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replacement for every illegal character.
pub const KEY_REPLACEMENT: char = '_';

/// Returns the storage key for a raw task id.
///
/// Borrows the input when it is already safe.
pub fn sanitize_key(raw_id: &str) -> Cow<'_, str> {
    if !raw_id.contains(ILLEGAL_KEY_CHARS) {
        return Cow::Borrowed(raw_id);
    }

    let key: String = raw_id
        .chars()
        .map(|c| {
            if ILLEGAL_KEY_CHARS.contains(&c) {
                KEY_REPLACEMENT
            } else {
                c
            }
        })
        .collect();
    tracing::trace!(raw_id, key = %key, "sanitized task id");
    Cow::Owned(key)
}

/// Rejects collection names that do not name a single directory entry:
/// blank names, `.`, `..`, and names containing a path separator.
pub fn validate_collection(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TaskrecError::config("collection must not be empty"));
    }
    if matches!(name, "." | "..") || name.contains(['/', '\\']) {
        return Err(TaskrecError::config(format!(
            "collection '{}' must be a plain name, not a path",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_id_is_borrowed() {
        let key = sanitize_key("550e8400-e29b-41d4-a716-446655440000");
        assert!(matches!(key, Cow::Borrowed(_)));
        assert_eq!(key, "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_every_illegal_char_is_replaced() {
        assert_eq!(sanitize_key(r#"a\b/c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_sanitization_is_deterministic() {
        let raw = "https://host/path?q=1";
        assert_eq!(sanitize_key(raw), sanitize_key(raw));
        assert_eq!(sanitize_key(raw), "https___host_path_q=1");
    }

    #[test]
    fn test_ids_differing_only_in_illegal_chars_collide() {
        assert_eq!(sanitize_key("job:1"), sanitize_key("job/1"));
        assert_eq!(sanitize_key("job:1"), sanitize_key("job_1"));
        assert_ne!(sanitize_key("job:1"), sanitize_key("job:2"));
    }

    #[test]
    fn test_non_ascii_is_kept() {
        assert_eq!(sanitize_key("タスク:1"), "タスク_1");
    }

    #[test]
    fn test_collection_names() {
        assert!(validate_collection("backgroundDownloaderTaskRecords").is_ok());
        assert!(validate_collection("archive.v2").is_ok());
        for name in ["", "  ", ".", "..", "../records", "a/b", r"a\b"] {
            assert!(validate_collection(name).unwrap_err().is_config(), "{name:?}");
        }
    }
}
