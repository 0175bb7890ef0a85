//! Completion backend seam and the call-shape fallback chain.

pub mod backend;
pub mod dispatch;
