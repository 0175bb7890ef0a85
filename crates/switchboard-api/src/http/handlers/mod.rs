//! Request handlers, grouped by resource.

pub mod card;
pub mod task;
