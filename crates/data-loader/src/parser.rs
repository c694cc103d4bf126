//! Parser for the movie and user record files.
//!
//! Both files are sequences of fixed-shape blocks separated by one line:
//!
//! - movies: id, title, release year, directors, actors, genres, rating
//! - users: full name, email, watch count N, then N movie ids
//!
//! List fields are comma separated and are not trimmed. A file that ends in
//! the middle of a block, or has an unparsable number, fails as a whole.
//! The line after a separator always starts a block, even when it is empty;
//! only blank lines running to the end of the file are ignored.
//!
//! Rust concepts you'll learn here:
//! - Borrowing: `BlockReader` hands out `&'a str` slices of the file
//!   contents and only allocates when a record is built
//! - `ok_or_else` and `map_err` turn a missing or bad line into a typed error
//!   that `?` propagates

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs;
use std::io::ErrorKind;
use std::iter::Enumerate;
use std::path::Path;
use std::str::Lines;
use tracing::{debug, warn};

/// Read a whole file, converting invalid UTF-8 sequences lossily.
///
/// Every invalid sequence becomes U+FFFD, so two values that differ only
/// in their invalid bytes compare equal afterwards. A warning is logged
/// whenever that replacement happens.
fn read_to_string_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(e) => {
            warn!(
                file = %path.display(),
                offset = e.utf8_error().valid_up_to(),
                "invalid UTF-8, replacing with U+FFFD"
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Walks a file one block at a time, tracking line numbers for errors.
struct BlockReader<'a> {
    file: &'a str,
    lines: Enumerate<Lines<'a>>,
    line_no: usize,
}

impl<'a> BlockReader<'a> {
    fn new(content: &'a str, file: &'a str) -> Self {
        Self {
            file,
            lines: content.lines().enumerate(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let (idx, line) = self.lines.next()?;
        self.line_no = idx + 1;
        Some(line)
    }

    /// First line of the next block.
    ///
    /// The line is taken as data even when it is empty, since an empty id
    /// or full name is still a field. Only a run of blank lines that
    /// reaches the end of the file ends the input.
    fn block_start(&mut self) -> Option<&'a str> {
        let line = self.next_line()?;
        if line.is_empty() && self.lines.clone().all(|(_, rest)| rest.is_empty()) {
            return None;
        }
        Some(line)
    }

    /// The next line of the current block, which must exist
    fn field(&mut self, field: &'static str) -> Result<&'a str> {
        self.next_line().ok_or_else(|| DataLoadError::TruncatedRecord {
            file: self.file.to_string(),
            line: self.line_no + 1,
            field,
        })
    }

    /// Consume the separator after a block, whatever it holds
    fn skip_separator(&mut self) {
        let _ = self.next_line();
    }

    fn parse_error(&self, reason: String) -> DataLoadError {
        DataLoadError::ParseError {
            file: self.file.to_string(),
            line: self.line_no,
            reason,
        }
    }
}

/// Split a comma-separated list.
///
/// Example: "A,B" -> ["A", "B"], "" -> [], "A," -> ["A"], "A,,B" -> ["A", "", "B"]
fn split_list(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }
    let mut items: Vec<String> = line.split(',').map(str::to_string).collect();
    if line.ends_with(',') {
        items.pop();
    }
    items
}

/// Parse the movie file at `path`
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let content = read_to_string_lossy(path)?;
    parse_movies_str(&content, &path.display().to_string())
}

/// Parse movie blocks from an in-memory string.
///
/// `file` is only used to label errors.
pub fn parse_movies_str(content: &str, file: &str) -> Result<Vec<Movie>> {
    let mut reader = BlockReader::new(content, file);
    let mut movies = Vec::new();

    while let Some(id) = reader.block_start() {
        let title = reader.field("title")?;
        let release_year = reader.field("release year")?;
        let directors = split_list(reader.field("directors")?);
        let actors = split_list(reader.field("actors")?);
        let genres = split_list(reader.field("genres")?);
        let rating_str = reader.field("rating")?;
        let rating = rating_str
            .trim()
            .parse::<f32>()
            .map_err(|e| reader.parse_error(format!("Invalid rating '{}': {}", rating_str, e)))?;

        movies.push(Movie {
            id: id.to_string(),
            title: title.to_string(),
            release_year: release_year.to_string(),
            directors,
            actors,
            genres,
            rating,
        });

        reader.skip_separator();
    }

    debug!(file, count = movies.len(), "parsed movie records");
    Ok(movies)
}

/// Parse the user file at `path`
pub fn parse_users(path: &Path) -> Result<Vec<User>> {
    let content = read_to_string_lossy(path)?;
    parse_users_str(&content, &path.display().to_string())
}

/// Parse user blocks from an in-memory string
pub fn parse_users_str(content: &str, file: &str) -> Result<Vec<User>> {
    let mut reader = BlockReader::new(content, file);
    let mut users = Vec::new();

    while let Some(full_name) = reader.block_start() {
        let email = reader.field("email")?;
        let count_str = reader.field("watch count")?;
        let count: usize = count_str.trim().parse().map_err(|e| {
            reader.parse_error(format!("Invalid watch count '{}': {}", count_str, e))
        })?;

        let mut watch_history = Vec::with_capacity(count);
        for _ in 0..count {
            watch_history.push(reader.field("watched movie id")?.to_string());
        }

        users.push(User {
            full_name: full_name.to_string(),
            email: email.to_string(),
            watch_history,
        });

        reader.skip_separator();
    }

    debug!(file, count = users.len(), "parsed user records");
    Ok(users)
}
