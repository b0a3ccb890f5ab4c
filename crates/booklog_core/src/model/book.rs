//! Book record domain model.
//!
//! # Responsibility
//! - Define one reading-log entry and the add-request shape that creates it.
//! - Derive the star rendering from the numeric rating.
//!
//! # Invariants
//! - `title` and `author` are never empty or whitespace-only.
//! - `rating` is always within `MIN_RATING..=MAX_RATING`.
//! - `stars()` always has exactly `rating` glyphs; a cached value that is
//!   absent or stale is never returned.

use chrono::NaiveDate;
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Glyph repeated once per rating point.
pub const STAR_GLYPH: &str = "⭐";
/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;
/// Rating preselected by add forms.
pub const DEFAULT_RATING: i64 = 3;

/// Field constraint violations for book records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyAuthor,
    RatingOutOfRange(i64),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyAuthor => write!(f, "author must not be empty"),
            Self::RatingOutOfRange(value) => write!(
                f,
                "rating {value} is out of range; expected {MIN_RATING}..={MAX_RATING}"
            ),
        }
    }
}

impl Error for BookValidationError {}

/// Add request for one finished book.
///
/// `rating` accepts any integer; values outside `1..=5` are rejected when
/// the request is turned into a `BookRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub date_finished: NaiveDate,
    pub reader: String,
    pub rating: i64,
    pub notes: String,
}

impl NewBook {
    /// Creates a request with empty reader/notes and the default rating.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        date_finished: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            date_finished,
            reader: String::new(),
            rating: DEFAULT_RATING,
            notes: String::new(),
        }
    }

    pub fn reader(mut self, reader: impl Into<String>) -> Self {
        self.reader = reader.into();
        self
    }

    pub fn rating(mut self, rating: i64) -> Self {
        self.rating = rating;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Canonical reading-log entry.
///
/// Fields are private so every instance goes through validation. Equality
/// ignores the cached star string since it is fully derived from `rating`.
#[derive(Debug, Clone)]
pub struct BookRecord {
    title: String,
    author: String,
    date_finished: NaiveDate,
    reader: String,
    rating: u8,
    notes: String,
    stars: Option<String>,
    extra: Vec<String>,
}

impl BookRecord {
    /// Validates an add request and builds a record with derived stars.
    ///
    /// Title, author and reader are trimmed; notes are kept verbatim.
    ///
    /// # Errors
    /// - `EmptyTitle` / `EmptyAuthor` for blank required fields.
    /// - `RatingOutOfRange` when `rating` is outside `1..=5`.
    pub fn from_new(book: NewBook) -> Result<Self, BookValidationError> {
        let title = book.title.trim();
        if title.is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        let author = book.author.trim();
        if author.is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        let rating = validate_rating(book.rating)?;

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            date_finished: book.date_finished,
            reader: book.reader.trim().to_string(),
            rating,
            notes: book.notes,
            stars: Some(stars_for(rating)),
            extra: Vec::new(),
        })
    }

    /// Rebuilds a record from persisted cells.
    ///
    /// Unlike `from_new`, no trimming happens: persisted text round-trips
    /// exactly. A `stars` cell that disagrees with `rating` is discarded and
    /// recomputed lazily on read.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_persisted(
        title: String,
        author: String,
        date_finished: NaiveDate,
        reader: String,
        rating: i64,
        notes: String,
        stars: Option<String>,
        extra: Vec<String>,
    ) -> Result<Self, BookValidationError> {
        if title.trim().is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if author.trim().is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        let rating = validate_rating(rating)?;
        let stars = stars.filter(|cell| is_current_stars(cell, rating));

        Ok(Self {
            title,
            author,
            date_finished,
            reader,
            rating,
            notes,
            stars,
            extra,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn date_finished(&self) -> NaiveDate {
        self.date_finished
    }

    pub fn reader(&self) -> &str {
        &self.reader
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Star rendering of `rating`.
    ///
    /// Borrows the cached value when present, otherwise computes it without
    /// touching the record.
    pub fn stars(&self) -> Cow<'_, str> {
        match self.stars.as_deref() {
            Some(cached) => Cow::Borrowed(cached),
            None => Cow::Owned(stars_for(self.rating)),
        }
    }

    /// Whether a star string is cached (absent for legacy rows).
    pub fn has_cached_stars(&self) -> bool {
        self.stars.is_some()
    }

    /// Values of unknown extra columns, aligned with the collection header.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    pub(crate) fn align_extra(&mut self, width: usize) {
        self.extra.resize(width, String::new());
    }
}

impl PartialEq for BookRecord {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.author == other.author
            && self.date_finished == other.date_finished
            && self.reader == other.reader
            && self.rating == other.rating
            && self.notes == other.notes
            && self.extra == other.extra
    }
}

impl Eq for BookRecord {}

/// Renders `rating` as repeated star glyphs.
pub fn stars_for(rating: u8) -> String {
    STAR_GLYPH.repeat(usize::from(rating))
}

/// Checks an arbitrary integer against the rating range.
pub fn validate_rating(value: i64) -> Result<u8, BookValidationError> {
    match u8::try_from(value) {
        Ok(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => Ok(rating),
        _ => Err(BookValidationError::RatingOutOfRange(value)),
    }
}

fn is_current_stars(cell: &str, rating: u8) -> bool {
    cell == STAR_GLYPH.repeat(usize::from(rating))
}

#[cfg(test)]
mod tests {
    use super::{stars_for, validate_rating, BookRecord, BookValidationError, NewBook};
    use chrono::NaiveDate;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
    }

    #[test]
    fn stars_repeat_glyph_per_rating_point() {
        assert_eq!(stars_for(1), "⭐");
        assert_eq!(stars_for(5).chars().count(), 5);
    }

    #[test]
    fn validate_rating_rejects_bounds_and_negatives() {
        assert_eq!(validate_rating(1), Ok(1));
        assert_eq!(validate_rating(5), Ok(5));
        assert_eq!(
            validate_rating(0),
            Err(BookValidationError::RatingOutOfRange(0))
        );
        assert_eq!(
            validate_rating(6),
            Err(BookValidationError::RatingOutOfRange(6))
        );
        assert_eq!(
            validate_rating(-300),
            Err(BookValidationError::RatingOutOfRange(-300))
        );
    }

    #[test]
    fn from_new_trims_required_fields_and_keeps_notes_verbatim() {
        let record = BookRecord::from_new(
            NewBook::new("  Dune ", "Herbert", date("2024-05-01"))
                .reader(" Sam ")
                .rating(4)
                .notes("  spaced\nnotes "),
        )
        .expect("valid book");

        assert_eq!(record.title(), "Dune");
        assert_eq!(record.reader(), "Sam");
        assert_eq!(record.notes(), "  spaced\nnotes ");
        assert_eq!(record.stars(), "⭐⭐⭐⭐");
        assert!(record.has_cached_stars());
    }

    #[test]
    fn from_new_rejects_blank_title_and_author() {
        let blank_title = NewBook::new("   ", "Herbert", date("2024-05-01"));
        assert_eq!(
            BookRecord::from_new(blank_title),
            Err(BookValidationError::EmptyTitle)
        );

        let blank_author = NewBook::new("Dune", "", date("2024-05-01"));
        assert_eq!(
            BookRecord::from_new(blank_author),
            Err(BookValidationError::EmptyAuthor)
        );
    }

    #[test]
    fn stale_persisted_stars_are_recomputed_on_read() {
        let record = BookRecord::from_persisted(
            "Emma".to_string(),
            "Austen".to_string(),
            date("2023-02-11"),
            String::new(),
            2,
            String::new(),
            Some("⭐⭐⭐⭐⭐".to_string()),
            Vec::new(),
        )
        .expect("valid persisted row");

        assert!(!record.has_cached_stars());
        assert_eq!(record.stars(), "⭐⭐");
    }
}
