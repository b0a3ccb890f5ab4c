//! Command-line front end for the reading log.
//!
//! # Responsibility
//! - Translate command-line arguments into reading-log operations.
//! - Render projections and outcomes as plain text.
//!
//! # Invariants
//! - Only `ReadingLog` entry points are used; the data file is never touched
//!   directly.
//! - Exit code 0 on success, 1 on operation failure, 2 on usage errors.

use booklog_core::{
    core_version, init_logging, AppConfig, CsvFileRepository, DisplayRow, NewBook,
    ProjectionFilter, ReadingLog, StoreError,
};
use chrono::NaiveDate;
use log::error;
use std::io::Write;
use std::process::ExitCode;

const USAGE: &str = "usage:
  booklog add <title> <author> <YYYY-MM-DD> <reader> <rating> [notes]
  booklog list [--reader NAME]... [--rating N]...
  booklog delete <display-index> [--reader NAME]... [--rating N]...
  booklog options
  booklog export [OUTPUT]
  booklog version

environment:
  BOOKLOG_DATA_FILE   data file (default book_tracker_data.csv)
  BOOKLOG_LOG_LEVEL   trace|debug|info|warn|error
  BOOKLOG_LOG_DIR     absolute directory for log files (logging off when unset)";

const NOTES_PREVIEW_CHARS: usize = 40;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Add(NewBook),
    List(ProjectionFilter),
    Delete {
        display_index: usize,
        filter: ProjectionFilter,
    },
    Options,
    Export(Option<String>),
    Version,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    if command == Command::Version {
        println!("booklog {}", core_version());
        return ExitCode::SUCCESS;
    }

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(1)
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir).map_err(|err| err.to_string())?;
    }

    let repo = CsvFileRepository::new(&config.data_file);
    let mut log = ReadingLog::open(repo).map_err(|err| {
        error!("event=cli_open module=cli status=error error={}", err);
        format!("cannot open `{}`: {err}", config.data_file.display())
    })?;

    match command {
        Command::Add(book) => {
            let added = log.add_record(book).map_err(describe_store_error)?;
            println!(
                "Book added: {} by {} {}",
                added.record.title(),
                added.record.author(),
                added.record.stars()
            );
        }
        Command::List(filter) => {
            let rows = log.get_projection(&filter);
            if rows.is_empty() {
                println!("No books found. Use `booklog add` to add your first book!");
            } else {
                print_rows(&rows);
            }
        }
        Command::Delete {
            display_index,
            filter,
        } => {
            let deleted = log
                .delete_record(display_index, &filter)
                .map_err(describe_store_error)?;
            println!(
                "Book deleted: {} by {}",
                deleted.record.title(),
                deleted.record.author()
            );
        }
        Command::Options => {
            let options = log.get_filter_options();
            let readers: Vec<String> = options
                .readers
                .iter()
                .map(|reader| {
                    if reader.is_empty() {
                        "(none)".to_string()
                    } else {
                        reader.clone()
                    }
                })
                .collect();
            let ratings: Vec<String> = options.ratings.iter().map(u8::to_string).collect();
            println!("readers: {}", readers.join(", "));
            println!("ratings: {}", ratings.join(", "));
        }
        Command::Export(output) => {
            let export = log.export_bytes().map_err(describe_store_error)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &export.bytes)
                        .map_err(|err| format!("cannot write `{path}`: {err}"))?;
                    println!("Exported {} bytes to {path}", export.bytes.len());
                }
                None => std::io::stdout()
                    .write_all(&export.bytes)
                    .map_err(|err| format!("cannot write export: {err}"))?,
            }
        }
        Command::Version => println!("booklog {}", core_version()),
    }

    Ok(())
}

fn describe_store_error(err: StoreError) -> String {
    match &err {
        StoreError::NotPersisted { .. } => {
            format!("{err}; the change is kept in memory only and will be lost on exit")
        }
        _ => err.to_string(),
    }
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let Some((name, rest)) = args.split_first() else {
        return Err("missing command".to_string());
    };

    match name.as_str() {
        "add" => parse_add(rest),
        "list" => Ok(Command::List(parse_filter(rest)?)),
        "delete" => {
            let Some((index, flags)) = rest.split_first() else {
                return Err("delete needs a display index".to_string());
            };
            let display_index = index
                .parse::<usize>()
                .map_err(|_| format!("invalid display index `{index}`"))?;
            Ok(Command::Delete {
                display_index,
                filter: parse_filter(flags)?,
            })
        }
        "options" if rest.is_empty() => Ok(Command::Options),
        "export" if rest.len() <= 1 => Ok(Command::Export(rest.first().cloned())),
        "version" | "--version" => Ok(Command::Version),
        other => Err(format!("unknown command or arguments for `{other}`")),
    }
}

fn parse_add(args: &[String]) -> Result<Command, String> {
    if !(5..=6).contains(&args.len()) {
        return Err("add needs <title> <author> <YYYY-MM-DD> <reader> <rating> [notes]".to_string());
    }

    let date_finished = NaiveDate::parse_from_str(&args[2], "%Y-%m-%d")
        .map_err(|_| format!("invalid date `{}`; expected YYYY-MM-DD", args[2]))?;
    let rating = args[4]
        .parse::<i64>()
        .map_err(|_| format!("invalid rating `{}`", args[4]))?;

    let mut book = NewBook::new(args[0].as_str(), args[1].as_str(), date_finished)
        .reader(args[3].as_str())
        .rating(rating);
    if let Some(notes) = args.get(5) {
        book = book.notes(notes.as_str());
    }
    Ok(Command::Add(book))
}

fn parse_filter(args: &[String]) -> Result<ProjectionFilter, String> {
    let mut filter = ProjectionFilter::new();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("`{flag}` needs a value"))?;
        match flag.as_str() {
            "--reader" => {
                filter.readers.insert(value.clone());
            }
            "--rating" => {
                let rating = value
                    .parse::<u8>()
                    .map_err(|_| format!("invalid rating filter `{value}`"))?;
                filter.ratings.insert(rating);
            }
            other => return Err(format!("unknown flag `{other}`")),
        }
    }
    Ok(filter)
}

fn print_rows(rows: &[DisplayRow]) {
    println!(
        "{:>3}  {:<28}  {:<20}  {:<10}  {:<10}  {:<5}  Notes",
        "#", "Title", "Author", "Finished", "Reader", "Stars"
    );
    for (index, row) in rows.iter().enumerate() {
        println!(
            "{:>3}  {:<28}  {:<20}  {:<10}  {:<10}  {:<5}  {}",
            index,
            clip(&row.title, 28),
            clip(&row.author, 20),
            row.date_finished.format("%Y-%m-%d").to_string(),
            clip(&row.reader, 10),
            row.stars,
            clip(&row.notes, NOTES_PREVIEW_CHARS)
        );
    }
}

/// Cuts to `max_chars` on one line, marking truncation with `…`.
fn clip(value: &str, max_chars: usize) -> String {
    let flat = value.replace(['\r', '\n'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut clipped: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::{clip, parse_command, Command};
    use booklog_core::{NewBook, ProjectionFilter};
    use chrono::NaiveDate;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_add_with_optional_notes() {
        let command =
            parse_command(&args(&["add", "Dune", "Herbert", "2024-05-01", "Sam", "5", "Great"]))
                .unwrap();
        let expected = NewBook::new("Dune", "Herbert", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .reader("Sam")
            .rating(5)
            .notes("Great");
        assert_eq!(command, Command::Add(expected));
    }

    #[test]
    fn add_rejects_malformed_date() {
        let err = parse_command(&args(&["add", "Dune", "Herbert", "May 1", "Sam", "5"]))
            .unwrap_err();
        assert!(err.contains("YYYY-MM-DD"));
    }

    #[test]
    fn parses_delete_with_repeated_filters() {
        let command = parse_command(&args(&[
            "delete", "2", "--reader", "Sam", "--reader", "Ana", "--rating", "4",
        ]))
        .unwrap();
        let filter = ProjectionFilter::new().readers(["Sam", "Ana"]).ratings([4]);
        assert_eq!(
            command,
            Command::Delete {
                display_index: 2,
                filter
            }
        );
    }

    #[test]
    fn rejects_unknown_flags_and_commands() {
        assert!(parse_command(&args(&["list", "--author", "x"])).is_err());
        assert!(parse_command(&args(&["list", "--reader"])).is_err());
        assert!(parse_command(&args(&["frobnicate"])).is_err());
        assert!(parse_command(&[]).is_err());
    }

    #[test]
    fn clip_flattens_and_truncates() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("line one\nline two", 8), "line on…");
    }
}
