//! Ordered reading-log collection.
//!
//! # Invariants
//! - Records keep insertion order; positions are dense (`0..len`).
//! - Every record's `extra` values line up with `extra_columns`.

use crate::model::book::BookRecord;

/// Canonical ordered sequence of book records.
///
/// Also remembers unknown columns found in the loaded file so they survive
/// the next save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    records: Vec<BookRecord>,
    extra_columns: Vec<String>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection that keeps the given extra column names.
    pub fn with_extra_columns(extra_columns: Vec<String>) -> Self {
        Self {
            records: Vec::new(),
            extra_columns,
        }
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&BookRecord> {
        self.records.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BookRecord> {
        self.records.iter()
    }

    /// Appends one record and returns its canonical position.
    pub fn push(&mut self, mut record: BookRecord) -> usize {
        record.align_extra(self.extra_columns.len());
        self.records.push(record);
        self.records.len() - 1
    }

    /// Removes the record at `position`, shifting later records down.
    ///
    /// Returns `None` and leaves the collection untouched when out of range.
    pub fn remove(&mut self, position: usize) -> Option<BookRecord> {
        if position < self.records.len() {
            Some(self.records.remove(position))
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a BookRecord;
    type IntoIter = std::slice::Iter<'a, BookRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
