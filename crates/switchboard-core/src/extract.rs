//! Structured-answer extraction from noisy text and backend payloads.
//!
//! Covers three request-level signals (secret intent, the "paired with N"
//! query shape, trailing "memory note:" markers), the two-tier 14-digit
//! code extraction, and the tiered text extraction from nested backend
//! response payloads.

use std::sync::LazyLock;

use regex::Regex;

use switchboard_types::memory::MAX_NOTE_CHARS;

/// An isolated run of exactly 14 digits.
static PURE_14: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{14})\b").expect("pure-14 pattern is valid"));

/// A digit-dominant run: digits interspersed with spaces/hyphens spanning
/// at least 14 raw characters.
static DIGITISH_14: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9\-\s]{13,}").expect("digitish pattern is valid"));

/// Keywords signalling that a structured numeric secret is expected.
static SECRET_INTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(secret|14[- ]?digit|code|number|digits?)\b")
        .expect("secret intent pattern is valid")
});

/// The "paired with <N>" query shape.
static PAIR_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bpaired with\s+([0-9]{2,})\b").expect("pair query pattern is valid")
});

/// A trailing "memory note:" marker; everything after it is the note.
static MEMORY_NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bmemory\s*note\s*:\s*(.+)$").expect("memory note pattern is valid")
});

/// Extract an exact 14-digit code from noisy text.
///
/// Tier 1 looks for an isolated 14-digit run. Tier 2 scans digit-dominant
/// runs, strips the non-digits, and accepts a candidate only if exactly 14
/// digits remain. Returns the first qualifying match.
pub fn extract_code(text: &str) -> Option<String> {
    if let Some(caps) = PURE_14.captures(text) {
        return Some(caps[1].to_string());
    }
    for m in DIGITISH_14.find_iter(text) {
        let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() == 14 {
            return Some(digits);
        }
    }
    None
}

/// Whether the request text signals that a structured numeric secret is
/// the expected answer.
pub fn has_secret_intent(text: &str) -> bool {
    SECRET_INTENT.is_match(text)
}

/// Extract the lookup key from a "paired with <N>" query, if present.
pub fn pair_query_key(text: &str) -> Option<String> {
    PAIR_QUERY.captures(text).map(|caps| caps[1].to_string())
}

/// Extract a trailing "memory note:" marker (case-insensitive, multiline).
///
/// The note is trimmed and truncated to [`MAX_NOTE_CHARS`] characters.
pub fn memory_note(text: &str) -> Option<String> {
    let caps = MEMORY_NOTE.captures(text)?;
    let note = caps[1].trim();
    if note.is_empty() {
        return None;
    }
    Some(note.chars().take(MAX_NOTE_CHARS).collect())
}

/// Pull the completion text out of a nested backend payload.
///
/// Tier 1: a top-level `output_text` string. Tier 2: an `output` /
/// `response` / `data` list whose first element carries a `content` list
/// with `output_text` / `text` entries (the text itself may be a string or
/// an object with a `content` field). Tier 3: the flattened
/// `choices[0].message.content` chat shape.
pub fn extract_backend_text(payload: &serde_json::Value) -> Option<String> {
    if let Some(text) = payload.get("output_text").and_then(|v| v.as_str()) {
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    let output = payload
        .get("output")
        .or_else(|| payload.get("response"))
        .or_else(|| payload.get("data"));
    if let Some(items) = output.and_then(|v| v.as_array()) {
        if let Some(content) = items.first().and_then(|first| first.get("content")).and_then(|c| c.as_array()) {
            for entry in content {
                let kind = entry.get("type").and_then(|t| t.as_str()).unwrap_or_default();
                if kind != "output_text" && kind != "text" {
                    continue;
                }
                let value = entry.get("text").or_else(|| entry.get("value"));
                match value {
                    Some(serde_json::Value::String(s)) => return Some(s.clone()),
                    Some(obj @ serde_json::Value::Object(_)) => {
                        if let Some(s) = obj.get("content").and_then(|c| c.as_str()) {
                            return Some(s.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    payload
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(String::from)
}
