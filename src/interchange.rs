//! CSV import and export.
//!
//! Export writes the visible columns of every row as comma-separated text and
//! hands it to a [`FileSink`]. Import reads a file asynchronously through
//! [`read_import_file`], then [`parse_csv`] matches its header line against the
//! grid's columns and turns each data line into a [`Row`].
//!
//! Records and fields are split with quote-aware splitters, so quoted
//! delimiters, doubled quotes and line breaks survive a round trip.

use crate::column::PreparedColumn;
use crate::error::GridError;
use crate::value::{Row, Value};
use bubbletea_rs::{Cmd, Msg};
use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Field delimiter for reading and writing.
pub const DELIMITER: char = ',';

/// MIME type of exported CSV files.
pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// Export targets offered by the data menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values, written by the grid itself.
    Csv,
    /// Spreadsheet; needs an export callback.
    Excel,
    /// Printable document; needs an export callback.
    Pdf,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "Excel",
            ExportFormat::Pdf => "PDF",
        })
    }
}

/// Quotes a field when it would not survive a plain split.
///
/// Fields holding the delimiter, a quote, a line break, or leading/trailing
/// whitespace are wrapped in quotes with inner quotes doubled.
///
/// ```rust
/// use bubbletea_datagrid::interchange::quote_field;
///
/// assert_eq!(quote_field("plain"), "plain");
/// assert_eq!(quote_field("Smith, J"), "\"Smith, J\"");
/// assert_eq!(quote_field("5\" pipe"), "\"5\"\" pipe\"");
/// ```
pub fn quote_field(value: &str) -> String {
    let needs_quotes = value.contains(DELIMITER)
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r')
        || value.trim() != value;
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Writes a header line and one line per row, joined with `\n`.
///
/// Cells are written from their display value, not a custom renderer.
pub fn write_csv(columns: &[PreparedColumn], rows: &[Row]) -> String {
    let header = columns
        .iter()
        .map(|c| quote_field(&c.header))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header);
    for row in rows {
        lines.push(
            columns
                .iter()
                .map(|c| quote_field(&row.display(&c.key)))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

/// The file name for an export made on `date`, e.g. `export_2024-11-05.csv`.
pub fn export_file_name(stem: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", stem, date.format("%Y-%m-%d"))
}

/// Splits one line into fields.
///
/// Unquoted fields are trimmed; quoted fields are kept verbatim. A trailing
/// carriage return is ignored.
///
/// ```rust
/// use bubbletea_datagrid::interchange::split_line;
///
/// assert_eq!(split_line(r#"a, "b, c" ,"say ""hi""""#), vec!["a", "b, c", r#"say "hi""#]);
/// ```
pub fn split_line(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    let finish = |current: &mut String, quoted: bool| {
        let field = std::mem::take(current);
        if quoted {
            field
        } else {
            field.trim().to_string()
        }
    };

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' && !quoted && current.trim().is_empty() {
            current.clear();
            in_quotes = true;
            quoted = true;
        } else if c == DELIMITER {
            fields.push(finish(&mut current, quoted));
            quoted = false;
        } else if quoted && c.is_whitespace() {
            // padding after a closing quote
        } else {
            current.push(c);
        }
    }

    fields.push(finish(&mut current, quoted));
    fields
}

/// Splits CSV text into records.
///
/// Records end at line breaks outside quoted fields, so a quoted field may span
/// several lines. A trailing carriage return stays on its record for
/// [`split_line`] to drop.
///
/// # Errors
///
/// [`GridError::UnterminatedQuote`] when a quoted field is still open at the
/// end of the text.
///
/// ```rust
/// use bubbletea_datagrid::interchange::split_records;
///
/// let records = split_records("id,note\nA,\"two\nlines\"\nB,x").unwrap();
/// assert_eq!(records, vec!["id,note", "A,\"two\nlines\"", "B,x"]);
/// ```
pub fn split_records(text: &str) -> Result<Vec<&str>, GridError> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut line = 1;
    let mut opened_on = 0;
    let mut in_quotes = false;
    let mut field_start = true;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        if in_quotes {
            if c == '"' {
                if chars.peek().map(|&(_, next)| next) == Some('"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match c {
            '"' if field_start => {
                in_quotes = true;
                field_start = false;
                opened_on = line;
            }
            '\n' => {
                records.push(&text[start..i]);
                start = i + 1;
                field_start = true;
            }
            DELIMITER => field_start = true,
            c if c.is_whitespace() => {}
            _ => field_start = false,
        }
    }

    if in_quotes {
        return Err(GridError::UnterminatedQuote(opened_on));
    }
    if start < text.len() {
        records.push(&text[start..]);
    }
    Ok(records)
}

/// Pairs each column with the index of the header that names it.
///
/// A header names a column when, trimmed and ignoring case, it equals the
/// column's header or key. Each column takes the first such header. Empty
/// headers name nothing.
pub fn match_headers<'a>(
    headers: &[String],
    columns: &'a [PreparedColumn],
) -> Vec<(usize, &'a PreparedColumn)> {
    let headers: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    columns
        .iter()
        .filter_map(|col| {
            let header = col.header.trim().to_lowercase();
            let key = col.key.to_lowercase();
            headers
                .iter()
                .position(|h| !h.is_empty() && (*h == header || *h == key))
                .map(|index| (index, col))
        })
        .collect()
}

/// Parses CSV text into rows keyed by the matched columns.
///
/// # Errors
///
/// [`GridError::EmptyFile`] when there is no header line,
/// [`GridError::NoMatchingColumns`] when no header names a column,
/// [`GridError::NoDataRows`] when no non-blank data line follows and
/// [`GridError::UnterminatedQuote`] when a quoted field never closes.
pub fn parse_csv(text: &str, columns: &[PreparedColumn]) -> Result<Vec<Row>, GridError> {
    let records = split_records(text)?;
    let mut lines = records.into_iter().filter(|l| !l.trim().is_empty());
    let header_line = lines.next().ok_or(GridError::EmptyFile)?;
    let headers = split_line(header_line);

    let matched = match_headers(&headers, columns);
    if matched.is_empty() {
        return Err(GridError::NoMatchingColumns);
    }
    tracing::debug!(
        matched = matched.len(),
        headers = headers.len(),
        "matched import headers"
    );

    let rows: Vec<Row> = lines
        .map(|line| {
            let cells = split_line(line);
            matched
                .iter()
                .map(|(index, col)| {
                    let value = cells
                        .get(*index)
                        .map(|cell| col.kind.parse(cell))
                        .unwrap_or(Value::Empty);
                    (col.key.clone(), value)
                })
                .collect()
        })
        .collect();

    if rows.is_empty() {
        return Err(GridError::NoDataRows);
    }
    Ok(rows)
}

/// A file written by a [`FileSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime: String,
    /// File contents.
    pub contents: String,
}

/// Somewhere exported files go.
pub trait FileSink: Send {
    /// Stores a file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file could not be stored.
    fn save(&mut self, name: &str, mime: &str, contents: &str) -> Result<(), GridError>;
}

/// Writes exported files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&mut self, name: &str, _mime: &str, contents: &str) -> Result<(), GridError> {
        let path = self.dir.join(name);
        std::fs::write(&path, contents)?;
        tracing::info!(path = %path.display(), "file written");
        Ok(())
    }
}

/// Keeps exported files in memory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Arc<Mutex<Vec<SavedFile>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The files saved so far.
    pub fn files(&self) -> Vec<SavedFile> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_default()
    }
}

impl FileSink for MemorySink {
    fn save(&mut self, name: &str, mime: &str, contents: &str) -> Result<(), GridError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| GridError::Callback("file store is unavailable".to_string()))?;
        files.push(SavedFile {
            name: name.to_string(),
            mime: mime.to_string(),
            contents: contents.to_string(),
        });
        Ok(())
    }
}

/// The contents of a file picked for import.
#[derive(Debug)]
pub struct ImportFileMsg {
    /// File name without its directory.
    pub name: String,
    /// The file's text, or why it could not be read.
    pub result: Result<String, GridError>,
}

/// Reads an import file and reports it as an [`ImportFileMsg`].
///
/// Only `.csv` files are read; anything else yields
/// [`GridError::UnsupportedFileType`].
pub fn read_import_file(path: impl Into<PathBuf>) -> Cmd {
    let path = path.into();
    bubbletea_rs::tick(std::time::Duration::from_nanos(1), move |_| {
        Box::new(load_import_file(&path)) as Msg
    })
}

/// Reads an import file synchronously.
pub fn load_import_file(path: &Path) -> ImportFileMsg {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let result = if is_csv {
        std::fs::read_to_string(path).map_err(GridError::from)
    } else {
        Err(GridError::UnsupportedFileType(name.clone()))
    };

    if let Err(err) = &result {
        tracing::warn!(file = name.as_str(), error = %err, "import file not read");
    }
    ImportFileMsg { name, result }
}
