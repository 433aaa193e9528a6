#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-datagrid/")]

//! # bubbletea-datagrid
//!
//! A data grid component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications: sorting, searching, column filters, a filter popup,
//! pagination, column visibility and ordering, expandable rows for columns
//! that do not fit, inline cell editing, and CSV import/export.
//!
//! ## Overview
//!
//! The grid works on rows already in memory. Callers declare [`column::Column`]s
//! and hand over a `Vec<`[`value::Row`]`>`; the grid never reorders that data.
//! Search, filters, sort and paging are pure functions over row indices (see
//! [`pipeline`]), so a row index names the same row whatever the view shows.
//!
//! Like every bubbletea component, [`DataGrid`] follows the Elm Architecture:
//! `update()` consumes key messages and `view()` renders a string.
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_datagrid::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//!
//! struct App {
//!     grid: DataGrid,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let columns = vec![
//!             Column::new("id", "Bill No"),
//!             Column::new("status", "Status").filterable(true),
//!             Column::new("amount", "Amount").with_kind(ValueKind::Number),
//!         ];
//!         let rows = vec![
//!             Row::new().with("id", "QB/1").with("status", "Fresh").with("amount", 120.0),
//!             Row::new().with("id", "QB/2").with("status", "Confirmed").with("amount", 80.0),
//!         ];
//!         let config = GridConfig::default()
//!             .with_title("Bills")
//!             .with_search_fields(&["id", "status"]);
//!         let grid = DataGrid::new(&columns, rows, config)
//!             .expect("column keys are unique")
//!             .with_file_sink(DirectorySink::new("."));
//!         (Self { grid }, None)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.grid.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.grid.view()
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`column`] | Column declarations, resolved columns, main/nested split |
//! | [`visibility`] | Column visibility and order controller |
//! | [`pipeline`] | Search, filter, sort and page over row indices |
//! | [`editor`] | Inline cell editor and text buffer |
//! | [`filter_popup`] | Free-form filter popup |
//! | [`interchange`] | CSV export and import, file sinks |
//! | [`paginator`] | Page cursor and pagination links |
//! | [`notify`] | Notifications and grid events |
//! | [`grid`] | The [`DataGrid`] component |

pub mod column;
pub mod config;
pub mod editor;
pub mod error;
pub mod filter_popup;
pub mod grid;
pub mod interchange;
pub mod key;
pub mod notify;
pub mod paginator;
pub mod pipeline;
pub mod value;
pub mod visibility;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// A focused component receives keyboard input; a blurred one ignores it.
/// [`DataGrid`] also drops any edit in progress and leaves text inputs when
/// it loses focus.
///
/// ```rust
/// use bubbletea_datagrid::prelude::*;
///
/// let (mut grid, _) = <DataGrid as bubbletea_rs::Model>::init();
/// assert!(grid.focused());
///
/// grid.blur();
/// assert!(!grid.focused());
///
/// grid.focus();
/// assert!(grid.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    ///
    /// May return a command to run, for example to trigger a redraw.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred (unfocused) state.
    fn blur(&mut self);

    /// Returns the current focus state of the component.
    fn focused(&self) -> bool;
}

pub use column::{Column, PreparedColumn};
pub use config::{GridConfig, Pagination};
pub use error::GridError;
pub use grid::{DataGrid, GridKeyMap, GridStyles, Handled};
pub use key::{
    matches, matches_binding, new_binding, with_disabled, with_help, with_keys, Binding,
    Help as KeyHelp, KeyMap, KeyPress,
};
pub use notify::{GridEvent, Notification};
pub use paginator::Model as Paginator;
pub use value::{Row, Value, ValueKind};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_datagrid::prelude::*;
///
/// let config = GridConfig::default().with_pagination(Pagination::new(3));
/// let grid = DataGrid::new(&[Column::new("id", "Id")], Vec::new(), config).unwrap();
/// assert_eq!(grid.total_pages(), 3);
/// ```
pub mod prelude {
    pub use crate::column::{Column, FilterOption, FilterType};
    pub use crate::config::{GridConfig, Pagination};
    pub use crate::error::GridError;
    pub use crate::filter_popup::{FilterField, FilterValues};
    pub use crate::grid::{DataAction, DataGrid, GridKeyMap, GridStyles, Handled, InputMode, Menu};
    pub use crate::interchange::{DirectorySink, ExportFormat, FileSink, MemorySink};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::notify::{GridEvent, Level, Notification};
    pub use crate::pipeline::{SortDirection, SortState};
    pub use crate::value::{Row, Value, ValueKind};
    pub use crate::visibility::MoveDirection;
    pub use crate::Component;
}
