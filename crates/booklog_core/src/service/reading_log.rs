//! UI-facing reading-log entry points.
//!
//! # Responsibility
//! - Expose the only operations a presentation layer may call.
//! - Translate display indexes into canonical positions before deleting.
//!
//! # Invariants
//! - Callers never touch the backing file directly.
//! - Exports always contain the full unfiltered collection.
//! - Deleting by display index removes exactly the record shown at that
//!   index under the same filter.

use crate::model::book::NewBook;
use crate::repo::BookRepository;
use crate::service::record_store::{RecordAdded, RecordDeleted, RecordStore, StoreError};
use crate::view::projector::{
    distinct_ratings, distinct_readers, project, resolve_display_index, DisplayRow,
    ProjectionFilter,
};
use log::{info, warn};

/// Download file name for exports.
pub const EXPORT_FILE_NAME: &str = "book_tracker_export.csv";
/// Media type of exported bytes.
pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

/// One-shot export download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: &'static str,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Candidate values for the reader and rating filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub readers: Vec<String>,
    pub ratings: Vec<u8>,
}

/// Reading-log facade over one record store.
pub struct ReadingLog<R: BookRepository> {
    store: RecordStore<R>,
}

impl<R: BookRepository> ReadingLog<R> {
    /// Loads the log through `repo`.
    pub fn open(repo: R) -> Result<Self, StoreError> {
        Ok(Self::from_store(RecordStore::open(repo)?))
    }

    pub fn from_store(store: RecordStore<R>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    /// Adds one finished book.
    pub fn add_record(&mut self, book: NewBook) -> Result<RecordAdded, StoreError> {
        self.store.add(book)
    }

    /// Deletes the record shown at `display_index` under `filter`.
    ///
    /// # Errors
    /// - `NotFound` when `display_index` is past the current projection;
    ///   `len` is the number of visible rows.
    /// - Any error of `RecordStore::delete`.
    pub fn delete_record(
        &mut self,
        display_index: usize,
        filter: &ProjectionFilter,
    ) -> Result<RecordDeleted, StoreError> {
        let collection = self.store.collection();
        let Some(position) = resolve_display_index(collection, filter, display_index) else {
            let visible = project(collection, filter).len();
            warn!(
                "event=book_delete module=reading_log status=rejected error_code=display_index_out_of_range display_index={} visible={}",
                display_index, visible
            );
            return Err(StoreError::NotFound {
                index: display_index,
                len: visible,
            });
        };

        info!(
            "event=book_delete module=reading_log status=resolved display_index={} position={}",
            display_index, position
        );
        self.store.delete(position)
    }

    /// Filtered, date-ordered rows for display.
    pub fn get_projection(&self, filter: &ProjectionFilter) -> Vec<DisplayRow> {
        project(self.store.collection(), filter)
    }

    /// Option lists for the reader and rating filters.
    pub fn get_filter_options(&self) -> FilterOptions {
        let collection = self.store.collection();
        FilterOptions {
            readers: distinct_readers(collection),
            ratings: distinct_ratings(collection),
        }
    }

    /// Full collection as a downloadable CSV.
    pub fn export_bytes(&self) -> Result<ExportPayload, StoreError> {
        let bytes = self.store.export_bytes()?;
        info!(
            "event=books_export module=reading_log status=ok records={} bytes={}",
            self.store.len(),
            bytes.len()
        );
        Ok(ExportPayload {
            file_name: EXPORT_FILE_NAME,
            media_type: EXPORT_MEDIA_TYPE,
            bytes,
        })
    }

    /// Retries persisting the current state after a failed save.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.store.save()
    }
}
