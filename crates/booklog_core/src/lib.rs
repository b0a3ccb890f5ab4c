//! Core domain logic for the family reading log.
//! This crate is the single source of truth for reading-log invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::AppConfig;
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::book::{stars_for, BookRecord, BookValidationError, NewBook, STAR_GLYPH};
pub use model::collection::Collection;
pub use repo::csv_file_repo::CsvFileRepository;
pub use repo::memory_repo::MemoryRepository;
pub use repo::{BookRepository, RepoError, RepoResult};
pub use service::reading_log::{
    ExportPayload, FilterOptions, ReadingLog, EXPORT_FILE_NAME, EXPORT_MEDIA_TYPE,
};
pub use service::record_store::{
    RecordAdded, RecordDeleted, RecordStore, StoreChange, StoreError,
};
pub use view::projector::{
    distinct_ratings, distinct_readers, project, resolve_display_index, DisplayRow,
    ProjectionFilter,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
