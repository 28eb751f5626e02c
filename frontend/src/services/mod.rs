//! Typed wrappers over the API endpoints the dashboard calls.

pub mod export;
pub mod search;
pub mod tasks;
