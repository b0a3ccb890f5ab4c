//! CSV file repository.
//!
//! # Responsibility
//! - Load the collection from a backing CSV file when it exists.
//! - Replace the backing file with the full collection after mutations.
//!
//! # Invariants
//! - A missing backing file loads as an empty collection.
//! - Saves go through a synced temp file in the target directory and an
//!   atomic rename; readers never observe a partially written file.
//! - Log events carry counts and durations only, never book contents.

use super::csv_codec::{decode_collection, encode_collection};
use super::{BookRepository, RepoError, RepoResult};
use crate::model::collection::Collection;
use log::{error, info};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// File name used when no backing path is configured.
pub const DEFAULT_DATA_FILE_NAME: &str = "book_tracker_data.csv";

/// Repository backed by one CSV file on the local filesystem.
#[derive(Debug, Clone)]
pub struct CsvFileRepository {
    path: PathBuf,
}

impl CsvFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(&self, bytes: &[u8]) -> std::io::Result<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(bytes)?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl BookRepository for CsvFileRepository {
    fn load(&self) -> RepoResult<Collection> {
        let started_at = Instant::now();
        info!("event=books_load module=repo status=start");

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=books_load module=repo status=ok source=empty duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(Collection::new());
            }
            Err(err) => {
                error!(
                    "event=books_load module=repo status=error duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(RepoError::Io(err));
            }
        };

        match decode_collection(&bytes) {
            Ok(collection) => {
                info!(
                    "event=books_load module=repo status=ok source=file records={} extra_columns={} duration_ms={}",
                    collection.len(),
                    collection.extra_columns().len(),
                    started_at.elapsed().as_millis()
                );
                Ok(collection)
            }
            Err(err) => {
                error!(
                    "event=books_load module=repo status=error duration_ms={} error_code=decode_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, collection: &Collection) -> RepoResult<()> {
        let started_at = Instant::now();
        let bytes = encode_collection(collection)?;

        match self.write_atomically(&bytes) {
            Ok(()) => {
                info!(
                    "event=books_save module=repo status=ok records={} bytes={} duration_ms={}",
                    collection.len(),
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=books_save module=repo status=error records={} duration_ms={} error_code=write_failed error={}",
                    collection.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(RepoError::Io(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CsvFileRepository;
    use crate::repo::BookRepository;
    use std::path::Path;

    #[test]
    fn path_is_kept_as_given() {
        let repo = CsvFileRepository::new("books.csv");
        assert_eq!(repo.path(), Path::new("books.csv"));
    }

    #[test]
    fn save_replaces_existing_file_without_leaving_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.csv");
        std::fs::write(&path, "stale").unwrap();

        let repo = CsvFileRepository::new(&path);
        repo.save(&Default::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Title,Author"));
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
