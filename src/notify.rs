//! Notifications and grid events.
//!
//! Interactive operations never fail loudly: the grid turns every outcome
//! worth telling the user about into a [`Notification`], and reports every
//! state change as a [`GridEvent`] to an optional hook.

use crate::error::GridError;
use crate::interchange::ExportFormat;
use crate::pipeline::SortState;
use crate::value::Value;
use std::fmt;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// An operation completed.
    Success,
    /// Neutral information.
    Info,
    /// The user asked for something that is not allowed.
    Warning,
    /// An operation failed.
    Error,
}

/// A short, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: Level,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// Creates a success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    /// Creates an informational notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    /// Creates a warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

impl From<&GridError> for Notification {
    fn from(err: &GridError) -> Self {
        if err.is_user_input() {
            Notification::warning(err.to_string())
        } else {
            Notification::error(err.to_string())
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A state change inside the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// The sort column or direction changed.
    SortChanged(SortState),
    /// The search text changed.
    SearchChanged(String),
    /// A column filter value changed.
    ColumnFilterChanged {
        /// Column key.
        key: String,
        /// New filter text.
        value: String,
    },
    /// The column filter panel was shown or hidden.
    ColumnFiltersToggled(bool),
    /// Filter popup values were applied.
    PopupFiltersApplied,
    /// A column was shown or hidden.
    ColumnToggled {
        /// Column key.
        key: String,
        /// Visibility after the toggle.
        visible: bool,
    },
    /// Every column was shown, or only the mandatory ones.
    AllColumnsToggled(bool),
    /// The column order changed; keys in the new order.
    ColumnsReordered(Vec<String>),
    /// The current page changed.
    PageChanged(usize),
    /// A row was expanded or collapsed.
    RowExpanded {
        /// Index of the row in the grid's data.
        row: usize,
        /// State after the toggle.
        expanded: bool,
    },
    /// A cell entered edit mode.
    EditStarted {
        /// Index of the row in the grid's data.
        row: usize,
        /// Column key.
        key: String,
    },
    /// An edit was accepted by the row-edit callback.
    EditCommitted {
        /// Index of the row in the grid's data.
        row: usize,
        /// Column key.
        key: String,
        /// The parsed value.
        value: Value,
    },
    /// An edit was discarded.
    EditCancelled,
    /// Data was exported.
    Exported {
        /// Format written.
        format: ExportFormat,
        /// Name of the written file.
        file_name: String,
        /// Number of data rows written.
        rows: usize,
    },
    /// Rows were imported.
    Imported(usize),
    /// A notification was raised.
    Notified(Notification),
}
