use booklog_core::repo::csv_codec::{decode_collection, encode_collection};
use booklog_core::{
    BookRepository, Collection, CsvFileRepository, NewBook, RecordStore, RepoError, StoreError,
};
use chrono::NaiveDate;

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn tricky_collection() -> Collection {
    let repo = booklog_core::MemoryRepository::new();
    let mut store = RecordStore::open(&repo).unwrap();
    store
        .add(
            NewBook::new("Dune", "Herbert", date("2024-05-01"))
                .reader("Sam")
                .rating(5)
                .notes("Great, really \"great\"\nsecond line\r\nthird, with comma"),
        )
        .unwrap();
    store
        .add(NewBook::new("The \"Quoted\" Title", "Le Guin, Ursula", date("2023-11-30")).rating(1))
        .unwrap();
    store
        .add(NewBook::new("Kokoro", "Sōseki", date("2022-02-28")).notes("  padded  "))
        .unwrap();
    store.collection().clone()
}

#[test]
fn save_then_load_round_trips_field_for_field() {
    let dir = tempfile::tempdir().unwrap();
    let repo = CsvFileRepository::new(dir.path().join("books.csv"));
    let collection = tricky_collection();

    repo.save(&collection).unwrap();
    let loaded = repo.load().unwrap();

    assert_eq!(loaded, collection);
    assert_eq!(
        loaded.records()[0].notes(),
        "Great, really \"great\"\nsecond line\r\nthird, with comma"
    );
    assert_eq!(loaded.records()[2].notes(), "  padded  ");
    assert!(loaded.records().iter().all(|record| record.has_cached_stars()));
}

#[test]
fn missing_file_loads_empty_collection_with_canonical_columns() {
    let dir = tempfile::tempdir().unwrap();
    let repo = CsvFileRepository::new(dir.path().join("absent.csv"));

    let loaded = repo.load().unwrap();
    assert!(loaded.is_empty());
    assert!(loaded.extra_columns().is_empty());
    assert!(!repo.path().exists());

    let header = String::from_utf8(repo.export(&loaded).unwrap()).unwrap();
    assert_eq!(header, "Title,Author,Date Finished,Reader,Rating,Notes,Stars\n");
}

#[test]
fn missing_required_columns_are_corrupt() {
    let err = decode_collection(b"Title,Author,Date Finished,Reader,Notes\n").unwrap_err();
    match err {
        RepoError::CorruptData(message) => assert!(message.contains("Rating"), "{message}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn wrong_field_count_is_corrupt() {
    let bytes = b"Title,Author,Date Finished,Reader,Rating,Notes\nDune,Herbert,2024-05-01\n";
    assert!(matches!(
        decode_collection(bytes).unwrap_err(),
        RepoError::CorruptData(_)
    ));
}

#[test]
fn legacy_file_without_stars_computes_them_lazily_until_next_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book_tracker_data.csv");
    let legacy = "Title,Author,Date Finished,Reader,Rating,Notes\n\
Emma,Austen,2023-02-11,Ana,4.0,\n\
Dune,Herbert,2024-05-01,Sam,5,Great\n";
    std::fs::write(&path, legacy).unwrap();

    let mut store = RecordStore::open(CsvFileRepository::new(&path)).unwrap();
    assert_eq!(store.all()[0].rating(), 4);
    assert!(!store.all()[0].has_cached_stars());
    assert_eq!(store.all()[0].stars(), "⭐⭐⭐⭐");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), legacy);

    store
        .add(NewBook::new("Kokoro", "Soseki", date("2022-02-28")).rating(3))
        .unwrap();
    let rewritten = std::fs::read_to_string(&path).unwrap();
    let mut lines = rewritten.lines();
    assert_eq!(
        lines.next(),
        Some("Title,Author,Date Finished,Reader,Rating,Notes,Stars")
    );
    assert_eq!(lines.next(), Some("Emma,Austen,2023-02-11,Ana,4,,⭐⭐⭐⭐"));
}

#[test]
fn reordered_and_extra_columns_are_accepted_and_preserved() {
    let bytes = "Rating,Title,Shelf,Notes,Author,Reader,Date Finished\n\
2,Emma,Classics,,Austen,Ana,2023-02-11\n";
    let collection = decode_collection(bytes.as_bytes()).unwrap();

    assert_eq!(collection.extra_columns(), ["Shelf"]);
    let record = &collection.records()[0];
    assert_eq!(record.title(), "Emma");
    assert_eq!(record.rating(), 2);
    assert_eq!(record.extra(), ["Classics"]);

    let encoded = String::from_utf8(encode_collection(&collection).unwrap()).unwrap();
    assert_eq!(
        encoded,
        "Title,Author,Date Finished,Reader,Rating,Notes,Stars,Shelf\n\
Emma,Austen,2023-02-11,Ana,2,,⭐⭐,Classics\n"
    );
}

#[test]
fn rows_with_invalid_values_name_the_row() {
    let bad_date = b"Title,Author,Date Finished,Reader,Rating,Notes\nDune,Herbert,05/01/2024,,5,\n";
    let err = decode_collection(bad_date).unwrap_err();
    assert!(err.to_string().contains("row 1"), "{err}");

    let blank_title = b"Title,Author,Date Finished,Reader,Rating,Notes\n,Herbert,2024-05-01,,5,\n";
    let err = decode_collection(blank_title).unwrap_err();
    assert!(err.to_string().contains("title"), "{err}");
}

#[test]
fn unreadable_backing_path_surfaces_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = CsvFileRepository::new(dir.path());

    let err = match RecordStore::open(repo) {
        Ok(_) => panic!("a directory is not a readable data file"),
        Err(err) => err,
    };
    assert!(matches!(err, StoreError::Io(_)), "{err}");
}

#[test]
fn save_into_missing_directory_fails_without_creating_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("books.csv");
    let repo = CsvFileRepository::new(&path);

    let err = repo.save(&tricky_collection()).unwrap_err();
    assert!(matches!(err, RepoError::Io(_)));
    assert!(!path.exists());
}
