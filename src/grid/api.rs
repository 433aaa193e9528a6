//! Caller hooks.
//!
//! Every hook is optional. Search, filter, sort and export hooks may take
//! over the operation by returning [`Handled::Yes`]; the grid then leaves
//! that part of the view to the caller. Import and row-edit hooks are the
//! authority for changing data and report failures as text.

use super::DataGrid;
use crate::filter_popup::FilterValues;
use crate::interchange::{ExportFormat, FileSink};
use crate::notify::GridEvent;
use crate::pipeline::SortState;
use crate::value::{Row, Value};

/// Whether a hook took over an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handled {
    /// The caller did the work; the grid does nothing more.
    Yes,
    /// The grid falls back to its own behaviour.
    #[default]
    No,
}

/// Called with the new search text.
pub type SearchCallback = Box<dyn FnMut(&str) -> Handled + Send>;
/// Called with applied filter popup values.
pub type FilterCallback = Box<dyn FnMut(&FilterValues) -> Handled + Send>;
/// Called with the new sort state.
pub type SortCallback = Box<dyn FnMut(&SortState) -> Handled + Send>;
/// Called when an export is requested.
pub type ExportCallback = Box<dyn FnMut(ExportFormat) -> Handled + Send>;
/// Called with parsed import rows.
pub type ImportCallback = Box<dyn FnMut(Vec<Row>) -> Result<(), String> + Send>;
/// Called with a committed edit: data row index, column key, new value.
pub type RowEditCallback = Box<dyn FnMut(usize, &str, &Value) -> Result<(), String> + Send>;
/// Called with the new 1-based page.
pub type PageChangeCallback = Box<dyn FnMut(usize) + Send>;
/// Called with every grid event.
pub type EventHook = Box<dyn FnMut(&GridEvent) + Send>;

#[derive(Default)]
pub(super) struct Callbacks {
    pub(super) on_search: Option<SearchCallback>,
    pub(super) on_filter: Option<FilterCallback>,
    pub(super) on_sort_change: Option<SortCallback>,
    pub(super) on_export: Option<ExportCallback>,
    pub(super) on_import: Option<ImportCallback>,
    pub(super) on_row_edit: Option<RowEditCallback>,
    pub(super) on_page_change: Option<PageChangeCallback>,
    pub(super) on_event: Option<EventHook>,
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_search", &self.on_search.is_some())
            .field("on_filter", &self.on_filter.is_some())
            .field("on_sort_change", &self.on_sort_change.is_some())
            .field("on_export", &self.on_export.is_some())
            .field("on_import", &self.on_import.is_some())
            .field("on_row_edit", &self.on_row_edit.is_some())
            .field("on_page_change", &self.on_page_change.is_some())
            .field("on_event", &self.on_event.is_some())
            .finish()
    }
}

impl DataGrid {
    /// Sets the search hook (builder pattern).
    pub fn with_on_search<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str) -> Handled + Send + 'static,
    {
        self.callbacks.on_search = Some(Box::new(f));
        self
    }

    /// Sets the filter popup hook (builder pattern).
    pub fn with_on_filter<F>(mut self, f: F) -> Self
    where
        F: FnMut(&FilterValues) -> Handled + Send + 'static,
    {
        self.callbacks.on_filter = Some(Box::new(f));
        self
    }

    /// Sets the sort hook (builder pattern).
    pub fn with_on_sort_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(&SortState) -> Handled + Send + 'static,
    {
        self.callbacks.on_sort_change = Some(Box::new(f));
        self
    }

    /// Sets the export hook (builder pattern).
    pub fn with_on_export<F>(mut self, f: F) -> Self
    where
        F: FnMut(ExportFormat) -> Handled + Send + 'static,
    {
        self.callbacks.on_export = Some(Box::new(f));
        self
    }

    /// Sets the import hook (builder pattern).
    ///
    /// Without one, imported rows are appended to the grid's data.
    pub fn with_on_import<F>(mut self, f: F) -> Self
    where
        F: FnMut(Vec<Row>) -> Result<(), String> + Send + 'static,
    {
        self.callbacks.on_import = Some(Box::new(f));
        self
    }

    /// Sets the row-edit hook (builder pattern).
    ///
    /// Inline editing is only offered when this hook is set.
    pub fn with_on_row_edit<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize, &str, &Value) -> Result<(), String> + Send + 'static,
    {
        self.callbacks.on_row_edit = Some(Box::new(f));
        self
    }

    /// Sets the page change hook (builder pattern).
    pub fn with_on_page_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.callbacks.on_page_change = Some(Box::new(f));
        self
    }

    /// Sets the event hook (builder pattern).
    pub fn with_event_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&GridEvent) + Send + 'static,
    {
        self.callbacks.on_event = Some(Box::new(f));
        self
    }

    /// Sets where exported files are written (builder pattern).
    pub fn with_file_sink<S>(mut self, sink: S) -> Self
    where
        S: FileSink + 'static,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    /// True when inline editing is available.
    pub fn has_edit_handler(&self) -> bool {
        self.callbacks.on_row_edit.is_some()
    }

    pub(super) fn emit(&mut self, event: GridEvent) {
        if let Some(hook) = self.callbacks.on_event.as_mut() {
            hook(&event);
        }
    }
}
