//! herald — a tokenized-command matching and dispatch engine.
//!
//! Incoming messages are split into whitespace tokens and matched against an
//! immutable grammar tree built at registration time. A successful walk
//! resolves to a terminal action ready to execute; a failed walk resolves to
//! one typed, position-anchored error for user-facing reporting.

pub mod arguments;
pub mod constants;
pub mod core;
pub mod models;
pub mod state;
pub mod system;
