//! Observability utilities for Switchboard.

pub mod tracing_setup;
