//! Read-only projections of the reading log for display.
//!
//! # Responsibility
//! - Filter and order records for display without touching the collection.
//! - Map display indexes back to canonical positions for deletion.
//!
//! # See also
//! - `service::reading_log` for the UI-facing entry points.

pub mod projector;
