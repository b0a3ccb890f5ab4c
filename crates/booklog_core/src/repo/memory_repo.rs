//! In-memory repository.
//!
//! Holds the last saved bytes instead of a file. Uses the same CSV codec as
//! `CsvFileRepository`, so loads and saves exercise the real format.

use super::csv_codec::{decode_collection, encode_collection};
use super::{BookRepository, RepoResult};
use crate::model::collection::Collection;
use std::cell::RefCell;

/// Repository keeping persisted bytes in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    bytes: RefCell<Option<Vec<u8>>>,
}

impl MemoryRepository {
    /// Creates a repository with nothing persisted yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with persisted CSV bytes.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: RefCell::new(Some(bytes.into())),
        }
    }

    /// Returns a copy of the last saved bytes.
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.bytes.borrow().clone()
    }
}

impl BookRepository for MemoryRepository {
    fn load(&self) -> RepoResult<Collection> {
        match self.bytes.borrow().as_deref() {
            Some(bytes) => decode_collection(bytes),
            None => Ok(Collection::new()),
        }
    }

    fn save(&self, collection: &Collection) -> RepoResult<()> {
        let encoded = encode_collection(collection)?;
        self.bytes.replace(Some(encoded));
        Ok(())
    }
}
