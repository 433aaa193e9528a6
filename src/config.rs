//! Grid configuration.

use crate::column::DEFAULT_MAX_VISIBLE_COLUMNS;
use crate::filter_popup::FilterField;
use crate::paginator::DEFAULT_PAGE_WINDOW;
use std::path::PathBuf;

/// Initial pagination settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page shown first, starting at 1.
    pub current_page: usize,
    /// Number of pages the rows are spread over.
    pub total_pages: usize,
}

impl Pagination {
    /// Starts on page 1 of `total_pages`.
    pub fn new(total_pages: usize) -> Self {
        Self {
            current_page: 1,
            total_pages,
        }
    }

    /// Starts on `page` instead of page 1.
    pub fn with_current_page(mut self, page: usize) -> Self {
        self.current_page = page;
        self
    }
}

/// Everything about a grid that is not columns, rows or callbacks.
///
/// # Examples
///
/// ```rust
/// use bubbletea_datagrid::config::{GridConfig, Pagination};
///
/// let config = GridConfig::default()
///     .with_title("Bills")
///     .with_max_visible_columns(4)
///     .with_mandatory_columns(&["id"])
///     .with_search_fields(&["id", "customer"])
///     .with_pagination(Pagination::new(3));
/// assert_eq!(config.max_visible_columns, 4);
/// assert!(config.default_editable);
/// ```
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Columns shown in the row before the rest move to the nested panel.
    pub max_visible_columns: usize,
    /// Keys of columns that can never be hidden.
    pub mandatory_columns: Vec<String>,
    /// Editability of columns that do not say.
    pub default_editable: bool,
    /// Pagination, if the rows are paged.
    pub pagination: Option<Pagination>,
    /// Inputs of the filter popup; no popup when empty.
    pub filter_fields: Vec<FilterField>,
    /// Keys searched by the search box; no local search when empty.
    pub search_fields: Vec<String>,
    /// Page links shown at once.
    pub page_window: usize,
    /// Render width in terminal cells.
    pub width: usize,
    /// Toolbar title.
    pub title: String,
    /// Count shown in the title badge instead of the row count.
    pub count: Option<usize>,
    /// Whether the toolbar is rendered.
    pub show_toolbar: bool,
    /// File name prefix of exports.
    pub export_file_stem: String,
    /// File offered by the data menu's import entry; no entry when unset.
    pub import_path: Option<PathBuf>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_visible_columns: DEFAULT_MAX_VISIBLE_COLUMNS,
            mandatory_columns: Vec::new(),
            default_editable: true,
            pagination: None,
            filter_fields: Vec::new(),
            search_fields: Vec::new(),
            page_window: DEFAULT_PAGE_WINDOW,
            width: 100,
            title: String::new(),
            count: None,
            show_toolbar: true,
            export_file_stem: "export".to_string(),
            import_path: None,
        }
    }
}

impl GridConfig {
    /// Sets how many columns fit in a row (builder pattern).
    pub fn with_max_visible_columns(mut self, max: usize) -> Self {
        self.max_visible_columns = max.max(1);
        self
    }

    /// Sets the mandatory column keys (builder pattern).
    pub fn with_mandatory_columns(mut self, keys: &[&str]) -> Self {
        self.mandatory_columns = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Sets the editability default (builder pattern).
    pub fn with_default_editable(mut self, editable: bool) -> Self {
        self.default_editable = editable;
        self
    }

    /// Enables pagination (builder pattern).
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Sets the filter popup inputs (builder pattern).
    pub fn with_filter_fields(mut self, fields: Vec<FilterField>) -> Self {
        self.filter_fields = fields;
        self
    }

    /// Sets the searched keys (builder pattern).
    pub fn with_search_fields(mut self, keys: &[&str]) -> Self {
        self.search_fields = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Sets the number of page links (builder pattern).
    pub fn with_page_window(mut self, window: usize) -> Self {
        self.page_window = window.max(1);
        self
    }

    /// Sets the render width (builder pattern).
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Sets the toolbar title (builder pattern).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the title badge count (builder pattern).
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Shows or hides the toolbar (builder pattern).
    pub fn with_toolbar(mut self, show: bool) -> Self {
        self.show_toolbar = show;
        self
    }

    /// Sets the export file name prefix (builder pattern).
    pub fn with_export_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.export_file_stem = stem.into();
        self
    }

    /// Sets the file the data menu imports (builder pattern).
    pub fn with_import_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_path = Some(path.into());
        self
    }
}
