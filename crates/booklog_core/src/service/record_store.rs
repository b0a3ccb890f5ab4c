//! Canonical record store.
//!
//! # Responsibility
//! - Hold the canonical collection for the lifetime of the process.
//! - Validate additions and flush the full collection after every mutation.
//!
//! # Invariants
//! - Rejected operations (`Validation`, `NotFound`) leave the collection
//!   untouched and trigger no save.
//! - A mutation whose save fails stays applied in memory and is reported as
//!   `StoreError::NotPersisted`; `save()` retries with the same state.
//! - The collection is only mutated through `add` and `delete`.

use crate::model::book::{BookRecord, BookValidationError, NewBook};
use crate::model::collection::Collection;
use crate::repo::{BookRepository, RepoError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome of a successful `add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAdded {
    /// Canonical position of the new record (always the last one).
    pub position: usize,
    pub record: BookRecord,
}

/// Outcome of a successful `delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDeleted {
    /// Canonical position the record held before removal.
    pub position: usize,
    pub record: BookRecord,
}

/// In-memory mutation that was applied but could not be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(RecordAdded),
    Deleted(RecordDeleted),
}

impl Display for StoreChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added(added) => write!(f, "book added at position {}", added.position),
            Self::Deleted(deleted) => {
                write!(f, "book removed from position {}", deleted.position)
            }
        }
    }
}

/// Store-level error for reading-log use-cases.
#[derive(Debug)]
pub enum StoreError {
    /// Add input violates a field constraint.
    Validation(BookValidationError),
    /// Position or display index does not address an existing record.
    NotFound { index: usize, len: usize },
    /// Backing data exists but is not a valid collection.
    CorruptData(String),
    /// Backing data could not be read or written.
    Io(std::io::Error),
    /// Mutation applied in memory, persisting it failed.
    NotPersisted {
        change: StoreChange,
        source: RepoError,
    },
}

impl StoreError {
    /// Returns the in-memory change that stayed applied, if any.
    pub fn applied_change(&self) -> Option<&StoreChange> {
        match self {
            Self::NotPersisted { change, .. } => Some(change),
            _ => None,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid book: {err}"),
            Self::NotFound { index, len } => {
                write!(f, "no book at index {index} ({len} available)")
            }
            Self::CorruptData(message) => write!(f, "corrupt book data: {message}"),
            Self::Io(err) => write!(f, "book data I/O failed: {err}"),
            Self::NotPersisted { change, source } => {
                write!(f, "{change}, but saving failed: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::NotPersisted { source, .. } => Some(source),
            Self::NotFound { .. } | Self::CorruptData(_) => None,
        }
    }
}

impl From<BookValidationError> for StoreError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Io(err) => Self::Io(err),
            RepoError::CorruptData(message) => Self::CorruptData(message),
        }
    }
}

/// Owner of the canonical collection and its persistence.
pub struct RecordStore<R: BookRepository> {
    repo: R,
    collection: Collection,
    unsaved: bool,
}

impl<R: BookRepository> RecordStore<R> {
    /// Loads the collection through `repo`.
    ///
    /// # Errors
    /// - `CorruptData` when the backing file lacks required columns or holds
    ///   invalid rows. Callers may fall back to `with_collection`.
    /// - `Io` when the backing file exists but cannot be read.
    pub fn open(repo: R) -> Result<Self, StoreError> {
        let collection = repo.load()?;
        info!(
            "event=store_open module=store status=ok records={}",
            collection.len()
        );
        Ok(Self::with_collection(repo, collection))
    }

    /// Wraps an already-loaded collection without touching `repo`.
    pub fn with_collection(repo: R, collection: Collection) -> Self {
        Self {
            repo,
            collection,
            unsaved: false,
        }
    }

    /// Validates and appends one record, then saves the full collection.
    ///
    /// # Errors
    /// - `Validation` for blank title/author or rating outside `1..=5`;
    ///   nothing changes.
    /// - `NotPersisted` when the record was appended but saving failed.
    pub fn add(&mut self, book: NewBook) -> Result<RecordAdded, StoreError> {
        let record = match BookRecord::from_new(book) {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    "event=book_add module=store status=rejected error_code=validation reason={}",
                    err
                );
                return Err(err.into());
            }
        };

        let position = self.collection.push(record);
        let added = RecordAdded {
            position,
            record: self.collection.records()[position].clone(),
        };

        match self.flush() {
            Ok(()) => {
                info!(
                    "event=book_add module=store status=ok position={} records={}",
                    position,
                    self.collection.len()
                );
                Ok(added)
            }
            Err(source) => Err(StoreError::NotPersisted {
                change: StoreChange::Added(added),
                source,
            }),
        }
    }

    /// Removes the record at canonical `position`, then saves.
    ///
    /// # Errors
    /// - `NotFound` when `position` is out of range; nothing changes.
    /// - `NotPersisted` when the record was removed but saving failed.
    pub fn delete(&mut self, position: usize) -> Result<RecordDeleted, StoreError> {
        let len = self.collection.len();
        let Some(record) = self.collection.remove(position) else {
            warn!(
                "event=book_delete module=store status=rejected error_code=not_found position={} records={}",
                position, len
            );
            return Err(StoreError::NotFound {
                index: position,
                len,
            });
        };

        let deleted = RecordDeleted { position, record };
        match self.flush() {
            Ok(()) => {
                info!(
                    "event=book_delete module=store status=ok position={} records={}",
                    position,
                    self.collection.len()
                );
                Ok(deleted)
            }
            Err(source) => Err(StoreError::NotPersisted {
                change: StoreChange::Deleted(deleted),
                source,
            }),
        }
    }

    /// Persists the current in-memory state.
    ///
    /// Used to retry after `NotPersisted`; also safe when nothing is pending.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.flush().map_err(StoreError::from)
    }

    /// Read-only view of all records in insertion order.
    pub fn all(&self) -> &[BookRecord] {
        self.collection.records()
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Whether the last save attempt failed.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Serializes the full collection in the persisted format.
    pub fn export_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self.repo.export(&self.collection)?)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn flush(&mut self) -> Result<(), RepoError> {
        match self.repo.save(&self.collection) {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(err) => {
                self.unsaved = true;
                error!(
                    "event=store_flush module=store status=error records={} error={}",
                    self.collection.len(),
                    err
                );
                Err(err)
            }
        }
    }
}
