//! Filtered, date-ordered display projection.
//!
//! # Invariants
//! - Empty filter sets mean "no constraint", never "exclude all".
//! - Rows are ordered by `date_finished` descending; ties keep collection
//!   order (stable sort).
//! - Each row remembers the canonical position of its record, so a display
//!   index always resolves to the record shown at that index.

use crate::model::book::BookRecord;
use crate::model::collection::Collection;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Reader/rating predicates applied to a projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionFilter {
    pub readers: BTreeSet<String>,
    pub ratings: BTreeSet<u8>,
}

impl ProjectionFilter {
    /// Filter that keeps every record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readers<I, S>(mut self, readers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.readers.extend(readers.into_iter().map(Into::into));
        self
    }

    pub fn ratings(mut self, ratings: impl IntoIterator<Item = u8>) -> Self {
        self.ratings.extend(ratings);
        self
    }

    /// Whether neither predicate constrains the projection.
    pub fn is_unconstrained(&self) -> bool {
        self.readers.is_empty() && self.ratings.is_empty()
    }

    pub fn matches(&self, record: &BookRecord) -> bool {
        let reader_ok = self.readers.is_empty() || self.readers.contains(record.reader());
        let rating_ok = self.ratings.is_empty() || self.ratings.contains(&record.rating());
        reader_ok && rating_ok
    }
}

/// One display row; serializes with the display column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    #[serde(skip)]
    position: usize,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Date Finished")]
    pub date_finished: NaiveDate,
    #[serde(rename = "Reader")]
    pub reader: String,
    #[serde(rename = "Stars")]
    pub stars: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

impl DisplayRow {
    fn from_record(position: usize, record: &BookRecord) -> Self {
        Self {
            position,
            title: record.title().to_string(),
            author: record.author().to_string(),
            date_finished: record.date_finished(),
            reader: record.reader().to_string(),
            stars: record.stars().into_owned(),
            notes: record.notes().to_string(),
        }
    }

    /// Canonical position of the record behind this row.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Builds the display rows for `collection` under `filter`.
pub fn project(collection: &Collection, filter: &ProjectionFilter) -> Vec<DisplayRow> {
    visible_positions(collection, filter)
        .into_iter()
        .filter_map(|position| {
            collection
                .get(position)
                .map(|record| DisplayRow::from_record(position, record))
        })
        .collect()
}

/// Resolves a zero-based display index to a canonical position.
///
/// Returns `None` when `display_index` is not part of the projection.
pub fn resolve_display_index(
    collection: &Collection,
    filter: &ProjectionFilter,
    display_index: usize,
) -> Option<usize> {
    visible_positions(collection, filter)
        .get(display_index)
        .copied()
}

/// Sorted, deduplicated reader names (the empty reader included).
pub fn distinct_readers(collection: &Collection) -> Vec<String> {
    collection
        .iter()
        .map(|record| record.reader().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, deduplicated ratings.
pub fn distinct_ratings(collection: &Collection) -> Vec<u8> {
    collection
        .iter()
        .map(BookRecord::rating)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn visible_positions(collection: &Collection, filter: &ProjectionFilter) -> Vec<usize> {
    let mut positions: Vec<(usize, NaiveDate)> = collection
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record))
        .map(|(position, record)| (position, record.date_finished()))
        .collect();
    positions.sort_by(|left, right| right.1.cmp(&left.1));
    positions.into_iter().map(|(position, _)| position).collect()
}
