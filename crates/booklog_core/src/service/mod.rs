//! Reading-log use-case services.
//!
//! # Responsibility
//! - Own the canonical collection and orchestrate persistence after mutations.
//! - Keep presentation layers decoupled from storage details.

pub mod reading_log;
pub mod record_store;
