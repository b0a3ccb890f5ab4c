//! Delimited-text codec for the reading-log file.
//!
//! # Responsibility
//! - Encode a full collection as UTF-8 CSV with a header row.
//! - Decode persisted CSV back into validated records.
//!
//! # Invariants
//! - Written header is `Title,Author,Date Finished,Reader,Rating,Notes,Stars`
//!   followed by preserved extra columns in their loaded order.
//! - Required columns may appear in any order on read; `Stars` is optional.
//! - Fields with delimiters, quotes or line breaks are quoted with doubled
//!   embedded quotes, so every string field round-trips exactly.

use crate::model::book::BookRecord;
use crate::model::collection::Collection;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

pub const TITLE_COLUMN: &str = "Title";
pub const AUTHOR_COLUMN: &str = "Author";
pub const DATE_FINISHED_COLUMN: &str = "Date Finished";
pub const READER_COLUMN: &str = "Reader";
pub const RATING_COLUMN: &str = "Rating";
pub const NOTES_COLUMN: &str = "Notes";
pub const STARS_COLUMN: &str = "Stars";

/// Columns every persisted file must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    TITLE_COLUMN,
    AUTHOR_COLUMN,
    DATE_FINISHED_COLUMN,
    READER_COLUMN,
    RATING_COLUMN,
    NOTES_COLUMN,
];

/// ISO 8601 calendar date, e.g. `2024-05-01`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Serializes the full collection, header included.
///
/// # Errors
/// - Returns `RepoError::Io` if the in-memory writer fails to flush.
pub fn encode_collection(collection: &Collection) -> RepoResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    header.push(STARS_COLUMN);
    header.extend(collection.extra_columns().iter().map(String::as_str));
    writer.write_record(&header).map_err(map_csv_error)?;

    for record in collection {
        let date = record.date_finished().format(DATE_FORMAT).to_string();
        let rating = record.rating().to_string();
        let stars = record.stars();
        let mut row: Vec<&str> = vec![
            record.title(),
            record.author(),
            date.as_str(),
            record.reader(),
            rating.as_str(),
            record.notes(),
            &*stars,
        ];
        row.extend(record.extra().iter().map(String::as_str));
        writer.write_record(&row).map_err(map_csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|err| RepoError::Io(err.into_error()))
}

/// Parses persisted CSV into a collection.
///
/// # Errors
/// - `CorruptData` when the header row is absent or lacks a required column.
/// - `CorruptData` naming the 1-based data row for malformed rows, dates,
///   ratings, or blank title/author.
pub fn decode_collection(bytes: &[u8]) -> RepoResult<Collection> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);
    let headers = reader.headers().map_err(map_csv_error)?.clone();
    if headers.is_empty() {
        return Err(RepoError::CorruptData("missing header row".to_string()));
    }

    let layout = ColumnLayout::resolve(&headers)?;
    let mut collection = Collection::with_extra_columns(layout.extra_names(&headers));

    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(map_csv_error)?;
        let record = layout.parse_row(&row, index + 1)?;
        collection.push(record);
    }

    Ok(collection)
}

/// Header positions of known columns within one file.
struct ColumnLayout {
    title: usize,
    author: usize,
    date_finished: usize,
    reader: usize,
    rating: usize,
    notes: usize,
    stars: Option<usize>,
    extra: Vec<usize>,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> RepoResult<Self> {
        let find = |name: &str| headers.iter().position(|header| header == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| find(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(RepoError::CorruptData(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let required = |name: &str| {
            find(name).ok_or_else(|| RepoError::CorruptData(format!("missing column {name}")))
        };
        let mut layout = Self {
            title: required(TITLE_COLUMN)?,
            author: required(AUTHOR_COLUMN)?,
            date_finished: required(DATE_FINISHED_COLUMN)?,
            reader: required(READER_COLUMN)?,
            rating: required(RATING_COLUMN)?,
            notes: required(NOTES_COLUMN)?,
            stars: find(STARS_COLUMN),
            extra: Vec::new(),
        };
        let known = layout.known_indices();
        layout.extra = (0..headers.len())
            .filter(|index| !known.contains(index))
            .collect();
        Ok(layout)
    }

    fn known_indices(&self) -> Vec<usize> {
        let mut indices = vec![
            self.title,
            self.author,
            self.date_finished,
            self.reader,
            self.rating,
            self.notes,
        ];
        indices.extend(self.stars);
        indices
    }

    fn extra_names(&self, headers: &StringRecord) -> Vec<String> {
        self.extra
            .iter()
            .map(|&index| headers.get(index).unwrap_or_default().to_string())
            .collect()
    }

    fn parse_row(&self, row: &StringRecord, row_number: usize) -> RepoResult<BookRecord> {
        let cell = |index: usize| row.get(index).unwrap_or_default();
        let corrupt = |message: String| RepoError::CorruptData(format!("row {row_number}: {message}"));

        let date_text = cell(self.date_finished);
        let date_finished = NaiveDate::parse_from_str(date_text.trim(), DATE_FORMAT)
            .map_err(|_| corrupt(format!("invalid {DATE_FINISHED_COLUMN} `{date_text}`")))?;

        let rating_text = cell(self.rating);
        let rating = parse_rating_cell(rating_text)
            .ok_or_else(|| corrupt(format!("invalid {RATING_COLUMN} `{rating_text}`")))?;

        let stars = self.stars.map(|index| cell(index).to_string());
        let extra = self.extra.iter().map(|&index| cell(index).to_string()).collect();

        BookRecord::from_persisted(
            cell(self.title).to_string(),
            cell(self.author).to_string(),
            date_finished,
            cell(self.reader).to_string(),
            rating,
            cell(self.notes).to_string(),
            stars,
            extra,
        )
        .map_err(|err| corrupt(err.to_string()))
    }
}

/// Parses a rating cell, accepting integral floats such as `4.0`.
fn parse_rating_cell(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(rating) = trimmed.parse::<i64>() {
        return Some(rating);
    }
    let float = trimmed.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() <= i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

fn map_csv_error(err: csv::Error) -> RepoError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => RepoError::Io(io_err),
            other => RepoError::CorruptData(format!("{other:?}")),
        }
    } else {
        RepoError::CorruptData(err.to_string())
    }
}
