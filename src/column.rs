//! Column declarations and the derived column schema.
//!
//! Callers declare [`Column`]s; [`prepare_columns`] resolves every optional
//! attribute into a [`PreparedColumn`]. The grid then orders prepared columns
//! by sequence, restricts them to the visible set and splits them into main
//! columns and nested (overflow) columns.

use crate::error::GridError;
use crate::value::{Row, Value, ValueKind};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

/// Default number of columns shown in the main row before overflowing into
/// the nested panel.
pub const DEFAULT_MAX_VISIBLE_COLUMNS: usize = 5;

/// Custom cell renderer, called with the cell value and its whole row.
pub type CellRenderer = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// The control used to filter a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    /// Free text contains-match.
    #[default]
    Text,
    /// Pick one of the column's filter options.
    Select,
    /// A date typed as text.
    Date,
}

/// One choice of a select filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Label shown to the user.
    pub label: String,
    /// Value written into the filter.
    pub value: String,
}

impl FilterOption {
    /// Creates an option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A caller-declared column.
///
/// # Examples
///
/// ```rust
/// use bubbletea_datagrid::column::{Column, FilterType};
/// use bubbletea_datagrid::value::ValueKind;
///
/// let status = Column::new("status", "Status")
///     .filterable(true)
///     .with_filter_type(FilterType::Select)
///     .with_kind(ValueKind::Enum)
///     .with_width(15);
/// assert_eq!(status.key, "status");
/// ```
#[derive(Clone)]
pub struct Column {
    /// Unique key used to index rows.
    pub key: String,
    /// Display label.
    pub header: String,
    /// Left-to-right order; declaration index when unset.
    pub sequence: Option<i32>,
    /// Explicit mandatory flag.
    pub mandatory: Option<bool>,
    /// Whether clicking the header sorts.
    pub sortable: bool,
    /// Whether the column gets an inline filter.
    pub filterable: bool,
    /// Filter control kind.
    pub filter_type: FilterType,
    /// Options for select filters.
    pub filter_options: Vec<FilterOption>,
    /// Explicit editable flag; the grid default applies when unset.
    pub editable: Option<bool>,
    /// Relative width in percent of the grid width.
    pub width: Option<u16>,
    /// Kind of the values in this column.
    pub kind: ValueKind,
    /// Custom renderer.
    pub cell: Option<CellRenderer>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sequence", &self.sequence)
            .field("mandatory", &self.mandatory)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("filter_type", &self.filter_type)
            .field("editable", &self.editable)
            .field("width", &self.width)
            .field("kind", &self.kind)
            .field("cell", &self.cell.as_ref().map(|_| "<renderer>"))
            .finish()
    }
}

impl Column {
    /// Creates a sortable, unfiltered text column.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sequence: None,
            mandatory: None,
            sortable: true,
            filterable: false,
            filter_type: FilterType::Text,
            filter_options: Vec::new(),
            editable: None,
            width: None,
            kind: ValueKind::Text,
            cell: None,
        }
    }

    /// Sets an explicit sequence.
    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Sets the mandatory flag explicitly.
    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = Some(mandatory);
        self
    }

    /// Enables or disables header sorting.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Enables or disables the inline column filter.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Sets the filter control kind.
    pub fn with_filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    /// Sets the select filter options.
    pub fn with_filter_options(mut self, options: Vec<FilterOption>) -> Self {
        self.filter_options = options;
        self
    }

    /// Sets the editable flag explicitly.
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    /// Sets the relative width in percent.
    pub fn with_width(mut self, percent: u16) -> Self {
        self.width = Some(percent);
        self
    }

    /// Sets the value kind.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Installs a custom renderer.
    pub fn with_cell<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(render));
        self
    }
}

/// A column with every attribute resolved.
#[derive(Clone)]
pub struct PreparedColumn {
    /// Unique key.
    pub key: String,
    /// Display label.
    pub header: String,
    /// Concrete sequence.
    pub sequence: i32,
    /// Resolved mandatory flag.
    pub mandatory: bool,
    /// Whether clicking the header sorts.
    pub sortable: bool,
    /// Whether the column gets an inline filter.
    pub filterable: bool,
    /// Filter control kind.
    pub filter_type: FilterType,
    /// Options for select filters.
    pub filter_options: Vec<FilterOption>,
    /// Resolved editable flag.
    pub editable: bool,
    /// Relative width in percent.
    pub width: Option<u16>,
    /// Kind of the values in this column.
    pub kind: ValueKind,
    /// Custom renderer.
    pub cell: Option<CellRenderer>,
}

impl fmt::Debug for PreparedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedColumn")
            .field("key", &self.key)
            .field("sequence", &self.sequence)
            .field("mandatory", &self.mandatory)
            .field("editable", &self.editable)
            .finish_non_exhaustive()
    }
}

impl PreparedColumn {
    /// Renders a cell of this column for display, honouring a custom renderer.
    pub fn render_cell(&self, row: &Row) -> String {
        match (&self.cell, row.get(&self.key)) {
            (Some(render), Some(value)) => render(value, row),
            (Some(render), None) => render(&Value::Empty, row),
            (None, _) => row.display(&self.key),
        }
    }

    /// Inline editing is offered for editable columns without a custom renderer.
    pub fn inline_editable(&self) -> bool {
        self.editable && self.cell.is_none()
    }
}

/// Resolves sequence, mandatory and editable flags for every column.
///
/// Sequence defaults to the declaration index. Mandatory resolves to the
/// explicit flag, else membership in `mandatory_keys`, else (only when no
/// mandatory keys were given at all) true for the first column.
///
/// # Errors
///
/// Returns [`GridError::DuplicateColumnKey`] when two columns share a key.
///
/// ```rust
/// use bubbletea_datagrid::column::{prepare_columns, Column};
///
/// let prepared = prepare_columns(
///     &[Column::new("id", "Id"), Column::new("status", "Status")],
///     &[],
///     true,
/// ).unwrap();
/// assert!(prepared[0].mandatory);
/// assert!(!prepared[1].mandatory);
/// assert_eq!(prepared[1].sequence, 1);
/// ```
pub fn prepare_columns(
    columns: &[Column],
    mandatory_keys: &[String],
    default_editable: bool,
) -> Result<Vec<PreparedColumn>, GridError> {
    let mut seen = HashSet::new();
    for col in columns {
        if !seen.insert(col.key.as_str()) {
            return Err(GridError::DuplicateColumnKey(col.key.clone()));
        }
    }

    Ok(columns
        .iter()
        .enumerate()
        .map(|(index, col)| PreparedColumn {
            key: col.key.clone(),
            header: col.header.clone(),
            sequence: col.sequence.unwrap_or(index as i32),
            mandatory: col.mandatory.unwrap_or_else(|| {
                mandatory_keys.contains(&col.key) || (index == 0 && mandatory_keys.is_empty())
            }),
            sortable: col.sortable,
            filterable: col.filterable,
            filter_type: col.filter_type,
            filter_options: col.filter_options.clone(),
            editable: col.editable.unwrap_or(default_editable),
            width: col.width,
            kind: col.kind,
            cell: col.cell.clone(),
        })
        .collect())
}

/// Orders columns by ascending sequence; ties keep their declaration order.
pub fn sort_by_sequence(mut columns: Vec<PreparedColumn>) -> Vec<PreparedColumn> {
    columns.sort_by_key(|c| c.sequence);
    columns
}

/// Restricts sequence-ordered columns to the visible set.
pub fn visible_in_order(
    sorted: &[PreparedColumn],
    visible: &BTreeSet<String>,
) -> Vec<PreparedColumn> {
    sorted
        .iter()
        .filter(|c| visible.contains(&c.key))
        .cloned()
        .collect()
}

/// Visible columns split into the main row and the nested overflow panel.
#[derive(Debug, Clone, Default)]
pub struct ColumnSplit {
    /// Columns rendered in the row itself.
    pub main: Vec<PreparedColumn>,
    /// Columns rendered in the expandable panel beneath the row.
    pub nested: Vec<PreparedColumn>,
}

impl ColumnSplit {
    /// True when rows need an expand toggle.
    pub fn has_nested(&self) -> bool {
        !self.nested.is_empty()
    }

    /// Main columns followed by nested columns.
    pub fn all(&self) -> impl Iterator<Item = &PreparedColumn> {
        self.main.iter().chain(self.nested.iter())
    }
}

/// Splits visible columns at `max_visible_columns`.
pub fn split_columns(visible: Vec<PreparedColumn>, max_visible_columns: usize) -> ColumnSplit {
    let mut main = visible;
    let nested = if main.len() > max_visible_columns {
        main.split_off(max_visible_columns)
    } else {
        Vec::new()
    };
    ColumnSplit { main, nested }
}
