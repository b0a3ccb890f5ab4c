//! Persistence adapters for the reading-log collection.
//!
//! # Responsibility
//! - Define the durable round-trip contract (`BookRepository`).
//! - Keep the CSV format and file replacement details out of the store.
//!
//! # Invariants
//! - `save` always writes the full collection, never a diff.
//! - `load` rejects files missing required columns instead of masking them.
//! - `export` produces the same bytes `save` would write and touches no file.

use crate::model::collection::Collection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod csv_codec;
pub mod csv_file_repo;
pub mod memory_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer failure.
#[derive(Debug)]
pub enum RepoError {
    /// Backing file could not be read or written.
    Io(std::io::Error),
    /// Backing data exists but cannot be interpreted as a collection.
    CorruptData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "book data I/O failed: {err}"),
            Self::CorruptData(message) => write!(f, "corrupt book data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::CorruptData(_) => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Durable round-trip contract for the canonical collection.
pub trait BookRepository {
    /// Loads the persisted collection, or an empty one when nothing exists yet.
    fn load(&self) -> RepoResult<Collection>;
    /// Replaces persisted state with the full `collection`.
    fn save(&self, collection: &Collection) -> RepoResult<()>;
    /// Serializes `collection` in the persisted format without storing it.
    fn export(&self, collection: &Collection) -> RepoResult<Vec<u8>> {
        csv_codec::encode_collection(collection)
    }
}

impl<R: BookRepository + ?Sized> BookRepository for &R {
    fn load(&self) -> RepoResult<Collection> {
        (**self).load()
    }

    fn save(&self, collection: &Collection) -> RepoResult<()> {
        (**self).save(collection)
    }

    fn export(&self, collection: &Collection) -> RepoResult<Vec<u8>> {
        (**self).export(collection)
    }
}
