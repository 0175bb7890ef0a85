//! Capability routes.
//!
//! A [`Route`] is the fixed capability category selected for a request.
//! Routes are recomputed per request and never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The capability category a request is dispatched to.
///
/// `Web` dispatches to the browsing collaborator; every other route goes to
/// the completion backend. `Default` is the catch-all when no heuristic
/// matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Web,
    Hash,
    Vision,
    Code,
    Math,
    Memory,
    Default,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Web => write!(f, "web"),
            Route::Hash => write!(f, "hash"),
            Route::Vision => write!(f, "vision"),
            Route::Code => write!(f, "code"),
            Route::Math => write!(f, "math"),
            Route::Memory => write!(f, "memory"),
            Route::Default => write!(f, "default"),
        }
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "web" => Ok(Route::Web),
            "hash" => Ok(Route::Hash),
            "vision" => Ok(Route::Vision),
            "code" => Ok(Route::Code),
            "math" => Ok(Route::Math),
            "memory" => Ok(Route::Memory),
            "default" => Ok(Route::Default),
            other => Err(format!("invalid route: '{other}'")),
        }
    }
}
