//! Intent classification.
//!
//! [`classify`] maps a request's text (and whether it carries an image
//! part) to a [`Route`]. The heuristics form an explicit ordered table of
//! predicate/route pairs; evaluation order is the tie-breaker, so the
//! classifier is total and deterministic with no confidence scores.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use switchboard_types::route::Route;
use switchboard_types::task::RequestPart;

use crate::parts::has_image_part;

/// Navigation verbs, named sites, and other web-intent phrases.
static WEB_KEYWORDS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)\bgo to\b",
        r"(?i)\bvisit\b",
        r"(?i)\bopen (?:site|page|link)\b",
        r"(?i)\bclick\b",
        r"(?i)\bnavigate\b",
        r"(?i)\bfill\b",
        r"(?i)\bsubmit\b",
        r"(?i)\blog ?in\b",
        r"(?i)\bsign ?up\b",
        r"(?i)\bplay\b",
        r"(?i)\btic-?tac-?toe\b",
        r"(?i)\badd to cart\b",
        r"(?i)\bcheckout\b",
        r"(?i)\bscrape\b",
        r"(?i)\bdownload\b",
        r"(?i)\bupload\b",
        r"(?i)\bgoogle docs\b",
        r"(?i)\bsalesforce\b",
        r"(?i)\blinked?in\b",
        r"(?i)\bbrowser\b",
    ])
    .expect("web keyword patterns are valid")
});

/// URL-shaped tokens: scheme-prefixed, www-prefixed, or a bare domain.
static URL_SHAPES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)https?://\S+",
        r"(?i)\bwww\.[^\s/]+\.\S+",
        r"(?i)\b[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+(?:/\S*)?\b",
    ])
    .expect("url patterns are valid")
});

static HASH_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(md5|sha512)\b").expect("hash pattern is valid"));

static CODE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(code|python|script|algorithm|function)\b").expect("code pattern is valid")
});

static MEMORY_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(remember|memory note|save this)\b").expect("memory pattern is valid")
});

fn is_web(text: &str) -> bool {
    WEB_KEYWORDS.is_match(text) || URL_SHAPES.is_match(text)
}

fn is_hash(text: &str) -> bool {
    HASH_WORDS.is_match(text)
}

fn is_math(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text.chars().any(|c| matches!(c, '+' | '-' | '*' | '/' | '^' | '%' | '(' | ')'))
}

fn is_code(text: &str) -> bool {
    CODE_WORDS.is_match(text)
}

fn is_memory(text: &str) -> bool {
    MEMORY_WORDS.is_match(text)
}

/// The ordered heuristic table. First matching predicate wins; the vision
/// check runs before this table because it looks at parts, not text.
const HEURISTICS: [(fn(&str) -> bool, Route); 5] = [
    (is_web, Route::Web),
    (is_hash, Route::Hash),
    (is_math, Route::Math),
    (is_code, Route::Code),
    (is_memory, Route::Memory),
];

/// Classify a request into a capability route.
///
/// Pure, deterministic, and total: always returns a route. An image part
/// short-circuits to [`Route::Vision`] regardless of text content.
pub fn classify(text: &str, has_image: bool) -> Route {
    if has_image {
        return Route::Vision;
    }
    let text = text.to_lowercase();
    for (predicate, route) in HEURISTICS {
        if predicate(&text) {
            return route;
        }
    }
    Route::Default
}

/// Classify from the raw request pieces the transport delivers.
pub fn classify_request(text: &str, parts: &[RequestPart]) -> Route {
    classify(text, has_image_part(parts))
}
