//! Core logic for Switchboard: intent routing, pair/code extraction,
//! memory semantics, and the per-request orchestrator.
//!
//! Everything here is either pure (router, extractors) or generic over the
//! trait seams defined in this crate ([`memory::MemoryStore`],
//! [`llm::backend::CompletionBackend`], [`browse::BrowsingAgent`],
//! [`sink::TaskSink`]). Concrete I/O implementations live in
//! `switchboard-infra`.

pub mod browse;
pub mod extract;
pub mod llm;
pub mod memory;
pub mod orchestrator;
pub mod pairs;
pub mod parts;
pub mod router;
pub mod sink;
