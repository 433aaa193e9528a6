//! Error taxonomy for the grid.
//!
//! Every variant's `Display` text is written for the end user: the grid shows
//! it verbatim in a notification when an interactive operation fails.

use crate::interchange::ExportFormat;

/// Errors produced by grid operations.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Two columns in one column set share a key.
    #[error("Duplicate column key: {0}")]
    DuplicateColumnKey(String),

    /// No column with this key exists.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Mandatory columns can never be hidden.
    #[error("Cannot hide mandatory column: {0}")]
    MandatoryColumn(String),

    /// Hiding the column would leave nothing visible.
    #[error("At least one column must be visible")]
    LastVisibleColumn,

    /// The cell's column does not allow inline editing.
    #[error("Column '{0}' is not editable")]
    NotEditable(String),

    /// Inline editing needs a row-edit callback.
    #[error("Editing is not available for this grid")]
    NoEditHandler,

    /// A row index points past the end of the data.
    #[error("Row {0} does not exist")]
    RowOutOfRange(usize),

    /// Imports only accept CSV files.
    #[error("Please select a CSV file (got '{0}')")]
    UnsupportedFileType(String),

    /// The imported file has no header line.
    #[error("The selected file is empty")]
    EmptyFile,

    /// No header of the imported file matched a column.
    #[error("No matching columns found in the CSV header")]
    NoMatchingColumns,

    /// The imported file has a header but no data lines.
    #[error("No valid data rows found in the CSV file")]
    NoDataRows,

    /// A quoted field in the imported file is never closed.
    #[error("Unterminated quoted field starting on line {0}")]
    UnterminatedQuote(usize),

    /// Export was requested for an empty grid.
    #[error("No data to export")]
    NoDataToExport,

    /// The format has no native serializer and the caller did not handle it.
    #[error("Export format not supported: {0}")]
    UnsupportedExportFormat(ExportFormat),

    /// Export needs somewhere to write the file.
    #[error("No file sink configured for export")]
    NoFileSink,

    /// Reading or writing a file failed.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller-supplied callback reported a failure.
    #[error("{0}")]
    Callback(String),
}

impl GridError {
    /// User-input violations are warnings; everything else is an error.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            GridError::MandatoryColumn(_)
                | GridError::LastVisibleColumn
                | GridError::UnknownColumn(_)
                | GridError::NotEditable(_)
                | GridError::NoEditHandler
                | GridError::RowOutOfRange(_)
        )
    }
}
