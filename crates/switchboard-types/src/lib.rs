//! Shared domain types for Switchboard.
//!
//! This crate holds the data shapes passed between the core logic and the
//! infrastructure layers: capability routes, LLM call shapes, task transport
//! events, the persisted memory document, configuration, and error enums.
//! It has no I/O and no async code.

pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod route;
pub mod task;
