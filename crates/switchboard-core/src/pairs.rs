//! Numeric-pair extraction.
//!
//! Finds associations between two numeric tokens (2+ digits each) inside
//! arbitrary text. Two tiers: a primary tier matching an explicit
//! connector between the tokens or a spelled-out "paired with" statement,
//! and a fallback pattern allowing 1-6 arbitrary non-digit characters.
//! Live ingestion ([`find_pairs`]) runs the fallback only when the primary
//! tier finds nothing in a given text; the recovery paths
//! ([`rebuild_pairs`], [`scan_history`]) run every pattern unconditionally
//! and merge the results.
//!
//! The `regex` crate has no look-around, so the "token is not a substring
//! of a longer number" guard is enforced by checking the bytes adjacent to
//! each match instead of `(?<!\d)` / `(?!\d)` assertions.

use std::sync::LazyLock;

use regex::Regex;

use switchboard_types::memory::MemoryDocument;
use switchboard_types::task::HistoryTurn;

/// Two numeric tokens joined by an explicit connector: arrows, colon,
/// dash, comma, pipe, slash, backslash, or unicode arrow/dash glyphs.
static PAIR_PRIMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2,})\s*(?:↔|<->|->|=>|→|—|–|:|-|,|\||/|\\)\s*([0-9]{2,})")
        .expect("primary pair pattern is valid")
});

/// A spelled-out pairing statement: "A is paired with B".
static PAIR_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]{2,})\s+(?:is\s+)?paired\s+with\s+([0-9]{2,})")
        .expect("phrase pair pattern is valid")
});

/// Two numeric tokens separated by 1-6 arbitrary non-digit characters.
static PAIR_FALLBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2,})[^0-9]{1,6}([0-9]{2,})").expect("fallback pair pattern is valid")
});

/// Whether the byte before `start` or at `end` is an ASCII digit, which
/// would mean a captured token is a substring of a longer number.
fn digit_adjacent(text: &str, start: usize, end: usize) -> bool {
    let bytes = text.as_bytes();
    let before = start.checked_sub(1).map(|i| bytes[i].is_ascii_digit());
    let after = bytes.get(end).map(|b| b.is_ascii_digit());
    before.unwrap_or(false) || after.unwrap_or(false)
}

fn find_with(pattern: &Regex, text: &str) -> Vec<(String, String)> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if digit_adjacent(text, whole.start(), whole.end()) {
                return None;
            }
            Some((caps[1].to_string(), caps[2].to_string()))
        })
        .collect()
}

/// Find all numeric-pair associations in a text.
///
/// The primary tier (explicit connector or a spelled-out "paired with"
/// statement) is preferred; the fallback tier runs only when the primary
/// finds nothing at all in this text.
pub fn find_pairs(text: &str) -> Vec<(String, String)> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut primary = find_with(&PAIR_PRIMARY, text);
    primary.extend(find_with(&PAIR_PHRASE, text));
    if !primary.is_empty() {
        return primary;
    }
    find_with(&PAIR_FALLBACK, text)
}

/// Every pattern applied unconditionally, duplicates and all. Recovery
/// paths use this so a fallback-only pair in the same text as a primary
/// match is still found.
fn find_pairs_all_patterns(text: &str) -> Vec<(String, String)> {
    let mut pairs = find_with(&PAIR_PRIMARY, text);
    pairs.extend(find_with(&PAIR_PHRASE, text));
    pairs.extend(find_with(&PAIR_FALLBACK, text));
    pairs
}

/// Re-scan every stored note of every user with every pattern and merge
/// discovered pairs into that user's pair map. Returns whether anything
/// changed.
///
/// Idempotent: repeated rebuilds converge to the same fixed point, so this
/// is safe to run whenever the pair index might be missing or stale.
pub fn rebuild_pairs(doc: &mut MemoryDocument) -> bool {
    let mut changed = false;
    for record in doc.values_mut() {
        let notes = record.notes.clone();
        for note in &notes {
            for (a, b) in find_pairs_all_patterns(note) {
                let known = record.pairs.get(&a) == Some(&b) && record.pairs.get(&b) == Some(&a);
                if !known {
                    record.set_pair(&a, &b);
                    changed = true;
                }
            }
        }
    }
    changed
}

/// Parse the visible history on the fly for pairs, without touching
/// persisted storage, and look up `key` in the result. Every pattern is
/// applied to every turn.
///
/// Later turns overwrite earlier ones, so the most recent statement of a
/// pair wins within the transcript.
pub fn scan_history(history: &[HistoryTurn], key: &str) -> Option<String> {
    let mut local = std::collections::HashMap::new();
    for turn in history {
        for (a, b) in find_pairs_all_patterns(&turn.text) {
            local.insert(a.clone(), b.clone());
            local.insert(b, a);
        }
    }
    local.get(key).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_types::memory::UserRecord;

    #[test]
    fn test_arrow_connector() {
        assert_eq!(
            find_pairs("note that 123456 -> 654321 please"),
            vec![("123456".to_string(), "654321".to_string())]
        );
    }

    #[test]
    fn test_various_connectors() {
        for text in [
            "55:99",
            "55 - 99",
            "55,99",
            "55 | 99",
            "55/99",
            "55 => 99",
            "55 ↔ 99",
            "55 → 99",
        ] {
            assert_eq!(
                find_pairs(text),
                vec![("55".to_string(), "99".to_string())],
                "failed for {text:?}"
            );
        }
    }

    #[test]
    fn test_single_digit_tokens_rejected() {
        assert!(find_pairs("5 -> 9").is_empty());
    }

    #[test]
    fn test_adjacent_digits_absorbed_into_token() {
        // Leftmost-longest matching absorbs adjacent digits into the token
        // itself rather than splitting a longer number.
        assert_eq!(
            find_pairs("91234:567"),
            vec![("91234".to_string(), "567".to_string())]
        );
    }

    #[test]
    fn test_fallback_tier_used_when_primary_misses() {
        // No connector and no pairing phrase; " then " is a 6-char gap,
        // within the fallback window.
        assert_eq!(
            find_pairs("was 77 then 88"),
            vec![("77".to_string(), "88".to_string())]
        );
    }

    #[test]
    fn test_primary_suppresses_fallback() {
        // The primary tier finds one pair; the fallback tier would find a
        // different split but must not run.
        let pairs = find_pairs("codes 11 -> 22 and also 33 near 44");
        assert_eq!(pairs, vec![("11".to_string(), "22".to_string())]);
    }

    #[test]
    fn test_paired_with_phrase() {
        assert_eq!(
            find_pairs("remember that 55 is paired with 99"),
            vec![("55".to_string(), "99".to_string())]
        );
        assert_eq!(
            find_pairs("55 paired with 99"),
            vec![("55".to_string(), "99".to_string())]
        );
        // A question has no leading token, so no pair is invented
        assert!(find_pairs("what is paired with 55").is_empty());
    }

    #[test]
    fn test_gap_longer_than_six_chars_rejected() {
        assert!(find_pairs("55 connects over to 99").is_empty());
    }

    #[test]
    fn test_rebuild_pairs_from_notes() {
        let mut doc = MemoryDocument::new();
        let mut record = UserRecord::default();
        record.push_note("remember 55 -> 99");
        doc.insert("alice".to_string(), record);

        assert!(rebuild_pairs(&mut doc));
        let record = &doc["alice"];
        assert_eq!(record.pairs.get("55").map(String::as_str), Some("99"));
        assert_eq!(record.pairs.get("99").map(String::as_str), Some("55"));
    }

    #[test]
    fn test_rebuild_merges_fallback_pairs_alongside_primary() {
        let mut doc = MemoryDocument::new();
        let mut record = UserRecord::default();
        record.push_note("codes 11 -> 22 and also 33 near 44");
        doc.insert("global".to_string(), record);

        assert!(rebuild_pairs(&mut doc));
        let record = &doc["global"];
        assert_eq!(record.pairs.get("11").map(String::as_str), Some("22"));
        assert_eq!(record.pairs.get("33").map(String::as_str), Some("44"));
    }

    #[test]
    fn test_rebuild_pairs_is_idempotent() {
        let mut doc = MemoryDocument::new();
        let mut record = UserRecord::default();
        record.push_note("pairs: 10 -> 20 and 30 -> 40");
        doc.insert("global".to_string(), record);

        assert!(rebuild_pairs(&mut doc));
        let after_first = doc.clone();
        assert!(!rebuild_pairs(&mut doc));
        assert_eq!(doc, after_first);
    }

    #[test]
    fn test_scan_history() {
        let history = vec![
            HistoryTurn { role: "user".to_string(), text: "remember 55 -> 99".to_string() },
            HistoryTurn { role: "agent".to_string(), text: "noted".to_string() },
        ];
        assert_eq!(scan_history(&history, "55").as_deref(), Some("99"));
        assert_eq!(scan_history(&history, "99").as_deref(), Some("55"));
        assert_eq!(scan_history(&history, "42"), None);
    }

    #[test]
    fn test_scan_history_finds_fallback_pairs_alongside_primary() {
        let history = vec![HistoryTurn {
            role: "user".to_string(),
            text: "codes 11 -> 22 and also 33 near 44".to_string(),
        }];
        assert_eq!(scan_history(&history, "11").as_deref(), Some("22"));
        assert_eq!(scan_history(&history, "33").as_deref(), Some("44"));
        assert_eq!(scan_history(&history, "44").as_deref(), Some("33"));
    }
}
