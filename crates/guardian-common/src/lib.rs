//! Shared metric data model for the guardian agent and server.

pub mod types;
