//! The persisted memory document.
//!
//! One JSON object maps user identity strings to [`UserRecord`]s. Each
//! record holds a bounded ring of free-text notes and a bidirectional map
//! of short numeric-string associations ("pairs"). The whole document is
//! read and written as a unit; atomicity is the store's job.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum notes kept per user; the oldest is evicted on overflow.
pub const MAX_NOTES_PER_USER: usize = 100;

/// Notes are truncated to this many characters before being stored.
pub const MAX_NOTE_CHARS: usize = 2000;

/// Default character budget for a memory summary.
pub const DEFAULT_SUMMARY_CHARS: usize = 1000;

/// Identity used when no user metadata is supplied.
pub const GLOBAL_USER_KEY: &str = "global";

/// Per-user memory: notes plus the symmetric pair index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Free-text notes, newest last. Append-only, capped at
    /// [`MAX_NOTES_PER_USER`].
    #[serde(default)]
    pub notes: Vec<String>,
    /// Bidirectional numeric-string associations. Invariant: whenever
    /// `pairs[a] == b`, `pairs[b] == a` also holds.
    #[serde(default)]
    pub pairs: BTreeMap<String, String>,
}

impl UserRecord {
    /// Append a note, evicting the oldest entries beyond the cap.
    /// Empty notes are ignored.
    pub fn push_note(&mut self, note: &str) {
        if note.is_empty() {
            return;
        }
        self.notes.push(note.to_string());
        if self.notes.len() > MAX_NOTES_PER_USER {
            let excess = self.notes.len() - MAX_NOTES_PER_USER;
            self.notes.drain(..excess);
        }
    }

    /// Upsert a symmetric pair. Both directions are written together;
    /// empty keys are ignored.
    pub fn set_pair(&mut self, a: &str, b: &str) {
        if a.is_empty() || b.is_empty() {
            return;
        }
        self.pairs.insert(a.to_string(), b.to_string());
        self.pairs.insert(b.to_string(), a.to_string());
    }
}

/// The full persisted document: user identity -> record.
pub type MemoryDocument = BTreeMap<String, UserRecord>;

/// Resolve the memory identity from request metadata.
///
/// Accepts `user_id`, `userId`, or `uid`; anything else (or no metadata at
/// all) falls back to the [`GLOBAL_USER_KEY`] sentinel.
pub fn user_key(metadata: &serde_json::Map<String, serde_json::Value>) -> String {
    for key in ["user_id", "userId", "uid"] {
        if let Some(value) = metadata.get(key) {
            match value {
                serde_json::Value::String(s) if !s.is_empty() => return s.clone(),
                serde_json::Value::Number(n) => return n.to_string(),
                _ => {}
            }
        }
    }
    GLOBAL_USER_KEY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_note_caps_at_limit() {
        let mut record = UserRecord::default();
        for i in 0..(MAX_NOTES_PER_USER + 1) {
            record.push_note(&format!("note {i}"));
        }
        assert_eq!(record.notes.len(), MAX_NOTES_PER_USER);
        // The oldest entry was evicted
        assert_eq!(record.notes[0], "note 1");
        assert_eq!(record.notes.last().unwrap(), &format!("note {MAX_NOTES_PER_USER}"));
    }

    #[test]
    fn test_push_note_ignores_empty() {
        let mut record = UserRecord::default();
        record.push_note("");
        assert!(record.notes.is_empty());
    }

    #[test]
    fn test_set_pair_is_symmetric() {
        let mut record = UserRecord::default();
        record.set_pair("123456", "654321");
        assert_eq!(record.pairs.get("123456").map(String::as_str), Some("654321"));
        assert_eq!(record.pairs.get("654321").map(String::as_str), Some("123456"));
    }

    #[test]
    fn test_set_pair_ignores_empty_keys() {
        let mut record = UserRecord::default();
        record.set_pair("", "99");
        record.set_pair("55", "");
        assert!(record.pairs.is_empty());
    }

    #[test]
    fn test_user_key_variants() {
        let mut meta = serde_json::Map::new();
        assert_eq!(user_key(&meta), GLOBAL_USER_KEY);

        meta.insert("uid".to_string(), serde_json::json!("alice"));
        assert_eq!(user_key(&meta), "alice");

        let mut meta = serde_json::Map::new();
        meta.insert("userId".to_string(), serde_json::json!(42));
        assert_eq!(user_key(&meta), "42");
    }

    #[test]
    fn test_user_record_deserialize_tolerates_missing_fields() {
        let record: UserRecord = serde_json::from_str(r#"{"notes":["a"]}"#).unwrap();
        assert_eq!(record.notes, vec!["a"]);
        assert!(record.pairs.is_empty());
    }
}
