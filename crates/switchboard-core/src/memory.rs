//! Memory store trait and pure summary helpers.
//!
//! The [`MemoryStore`] trait is the seam between the orchestrator and the
//! persisted document; the JSON-file implementation lives in
//! `switchboard-infra`. Uses RPITIT (native async fn in traits).
//!
//! `find_pair_any` is deliberately a **global fallback index**: it scans
//! every user's pair map, crossing user boundaries by design. Callers that
//! need per-user isolation must stop at `find_pair`.

use switchboard_types::error::MemoryError;

/// Durable, user-keyed memory: bounded note rings plus the symmetric pair
/// index. Implementations must serialize read-modify-write cycles within
/// the process and write the backing document atomically.
pub trait MemoryStore: Send + Sync {
    /// All notes for a user, oldest first.
    fn get_notes(
        &self,
        user: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, MemoryError>> + Send;

    /// Append a note for a user. No-op on empty text; the note ring is
    /// capped at 100 entries with the oldest evicted.
    fn append_note(
        &self,
        user: &str,
        note: &str,
    ) -> impl std::future::Future<Output = Result<(), MemoryError>> + Send;

    /// A bulleted summary of the user's notes, truncated from the front to
    /// `max_chars` so the most recent content survives.
    fn summary(
        &self,
        user: &str,
        max_chars: usize,
    ) -> impl std::future::Future<Output = Result<String, MemoryError>> + Send;

    /// Upsert a symmetric pair for a user (both directions together).
    fn set_pair(
        &self,
        user: &str,
        a: &str,
        b: &str,
    ) -> impl std::future::Future<Output = Result<(), MemoryError>> + Send;

    /// Look up a pair value in this user's map only.
    fn find_pair(
        &self,
        user: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, MemoryError>> + Send;

    /// Global fallback index: search every user's pair map; on a miss,
    /// rebuild all pair maps from notes once and retry.
    fn find_pair_any(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, MemoryError>> + Send;

    /// Extract pairs from arbitrary text into the user's pair map.
    fn ingest_text_for_pairs(
        &self,
        user: &str,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), MemoryError>> + Send;

    /// Re-scan every user's notes and merge discovered pairs. Idempotent.
    fn rebuild_all(&self) -> impl std::future::Future<Output = Result<(), MemoryError>> + Send;
}

/// Join notes as a bulleted list, newest last, truncated from the front
/// when over budget.
pub fn summarize_notes(notes: &[String], max_chars: usize) -> String {
    if notes.is_empty() {
        return String::new();
    }
    let joined = notes
        .iter()
        .map(|n| format!("- {n}"))
        .collect::<Vec<_>>()
        .join("\n");
    tail_chars(&joined, max_chars)
}

/// Keep the last `max_chars` characters of a string.
pub fn tail_chars(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    text.chars().skip(count - max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_bullets_newest_last() {
        let notes = vec!["first".to_string(), "second".to_string()];
        assert_eq!(summarize_notes(&notes, 1000), "- first\n- second");
    }

    #[test]
    fn test_summary_truncates_from_front() {
        let notes = vec!["old old old".to_string(), "recent".to_string()];
        let summary = summarize_notes(&notes, 10);
        assert_eq!(summary.chars().count(), 10);
        assert!(summary.ends_with("- recent"));
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(summarize_notes(&[], 1000), "");
    }

    #[test]
    fn test_tail_chars_multibyte_safe() {
        let text = "héllo wörld";
        assert_eq!(tail_chars(text, 5), "wörld");
    }
}
