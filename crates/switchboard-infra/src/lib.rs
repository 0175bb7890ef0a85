//! Infrastructure implementations for Switchboard: the JSON-file memory
//! store, the HTTP completion backend, the HTTP browsing agent, and the
//! configuration loader. Everything here implements a trait seam defined
//! in `switchboard-core`.

pub mod browse;
pub mod config;
pub mod llm;
pub mod store;
