//! The data grid component.
//!
//! [`DataGrid`] lists rows already in memory and owns every piece of view
//! state around them: column visibility and order, sort, search, column
//! filters, filter popup values, expanded rows, the page cursor, and the
//! inline cell editor. Rows are never reordered in place; every view is a list
//! of indices into the grid's data, so a row index always names the same row.
//!
//! ## Hooks
//!
//! Search, filter, sort, export, import, row edit and page changes can be
//! observed or taken over by the caller (see [`Handled`]). Without hooks the
//! grid searches, filters, sorts and exports by itself.
//!
//! ## Failures
//!
//! Interactive operations never panic and never stop the grid. Each failure
//! becomes a [`Notification`], shown under the grid and reported to the event
//! hook.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_datagrid::column::Column;
//! use bubbletea_datagrid::config::GridConfig;
//! use bubbletea_datagrid::grid::DataGrid;
//! use bubbletea_datagrid::value::Row;
//!
//! let columns = vec![Column::new("id", "Bill No"), Column::new("status", "Status")];
//! let rows = vec![
//!     Row::new().with("id", "QB/1").with("status", "Fresh"),
//!     Row::new().with("id", "QB/2").with("status", "Draft"),
//! ];
//! let config = GridConfig::default().with_search_fields(&["status"]);
//! let mut grid = DataGrid::new(&columns, rows, config).unwrap();
//!
//! grid.set_search_text("draft");
//! assert_eq!(grid.processed_indices(), vec![1]);
//! ```

mod api;
pub mod keys;
mod model;
mod rendering;
pub mod style;

#[cfg(test)]
mod tests;

pub use api::{
    EventHook, ExportCallback, FilterCallback, Handled, ImportCallback, PageChangeCallback,
    RowEditCallback, SearchCallback, SortCallback,
};
pub use keys::GridKeyMap;
pub use style::GridStyles;

use crate::config::GridConfig;
use crate::editor::{CellEditor, EditOutcome, TextBuffer};
use crate::filter_popup::{FilterPopup, FilterValues, PopupOutcome};
use crate::interchange::{ExportFormat, FileSink, ImportFileMsg};
use crate::notify::{GridEvent, Notification};
use crate::paginator::Model as Paginator;
use crate::pipeline::SortState;
use crate::value::Row;
use crate::visibility::{ColumnController, MoveDirection};
use crate::Component;
use api::Callbacks;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use std::collections::BTreeMap;

/// Which text input, if any, receives typed characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys drive the grid.
    #[default]
    Normal,
    /// Keys edit the search box.
    Search,
    /// Keys edit the filter of this column.
    ColumnFilter(String),
}

/// An entry of the data menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAction {
    /// Export in a format.
    Export(ExportFormat),
    /// Import the configured CSV file.
    Import,
}

/// The open overlay menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Menu {
    /// No menu.
    #[default]
    Closed,
    /// Column visibility and order. Entry 0 toggles every column; entry
    /// `n` is the `n`th column in sequence order.
    Columns {
        /// Focused entry.
        cursor: usize,
    },
    /// Import and export actions.
    Data {
        /// Focused entry.
        cursor: usize,
    },
}

/// A data grid over rows in memory.
pub struct DataGrid {
    columns: ColumnController,
    data: Vec<Row>,
    config: GridConfig,
    sort: SortState,
    sort_delegated: bool,
    search: TextBuffer,
    search_delegated: bool,
    input_mode: InputMode,
    filter_input: TextBuffer,
    column_filters: BTreeMap<String, String>,
    show_column_filters: bool,
    popup: FilterPopup,
    popup_filters: FilterValues,
    expanded_rows: BTreeMap<usize, bool>,
    paginator: Option<Paginator>,
    cursor_row: usize,
    cursor_col: usize,
    editor: CellEditor,
    menu: Menu,
    notifications: Vec<Notification>,
    callbacks: Callbacks,
    sink: Option<Box<dyn FileSink>>,
    focus: bool,
    /// Key bindings.
    pub keymap: GridKeyMap,
    /// Styles.
    pub styles: GridStyles,
}

impl std::fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("columns", &self.columns)
            .field("rows", &self.data.len())
            .field("sort", &self.sort)
            .field("input_mode", &self.input_mode)
            .field("menu", &self.menu)
            .field("callbacks", &self.callbacks)
            .field("sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl DataGrid {
    fn handle_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if self.editor.is_editing() {
            match self.editor.handle_key(key_msg) {
                EditOutcome::Commit(commit) => {
                    let _ = self.finish_edit(commit);
                }
                EditOutcome::Cancelled => self.emit(GridEvent::EditCancelled),
                EditOutcome::Continue | EditOutcome::Ignored => {}
            }
            return None;
        }

        match self.input_mode.clone() {
            InputMode::Search => {
                if self.keymap.search_done.matches(key_msg) {
                    self.input_mode = InputMode::Normal;
                } else if self.search.handle_key(&self.editor.keymap, key_msg) {
                    let text = self.search.value();
                    self.apply_search_text(text);
                }
                return None;
            }
            InputMode::ColumnFilter(column) => {
                if self.keymap.search_done.matches(key_msg) {
                    self.input_mode = InputMode::Normal;
                } else if self.filter_input.handle_key(&self.editor.keymap, key_msg) {
                    let value = self.filter_input.value();
                    self.set_column_filter(&column, &value);
                }
                return None;
            }
            InputMode::Normal => {}
        }

        if self.popup.is_open() {
            match self.popup.handle_key(key_msg) {
                PopupOutcome::Applied(values) => self.apply_popup_filters(values),
                PopupOutcome::Closed | PopupOutcome::Continue | PopupOutcome::Ignored => {}
            }
            return None;
        }

        match self.menu {
            Menu::Columns { cursor } => {
                self.handle_column_menu_key(cursor, key_msg);
                return None;
            }
            Menu::Data { cursor } => return self.handle_data_menu_key(cursor, key_msg),
            Menu::Closed => {}
        }

        self.handle_normal_key(key_msg)
    }

    fn handle_normal_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        let km = &self.keymap;
        if km.row_up.matches(key_msg) {
            self.move_cursor_row(-1);
        } else if km.row_down.matches(key_msg) {
            self.move_cursor_row(1);
        } else if km.column_left.matches(key_msg) {
            self.move_cursor_col(-1);
        } else if km.column_right.matches(key_msg) {
            self.move_cursor_col(1);
        } else if km.sort.matches(key_msg) {
            if let Some(key) = self.selected_column_key() {
                self.sort_by(&key);
            }
        } else if km.expand.matches(key_msg) {
            if let Some(row) = self.selected_row_index() {
                self.toggle_row_expanded(row);
            }
        } else if km.edit.matches(key_msg) {
            let selected = (self.selected_row_index(), self.selected_column_key());
            if let (Some(row), Some(key)) = selected {
                let _ = self.begin_edit(row, &key);
            }
        } else if km.search.matches(key_msg) {
            self.input_mode = InputMode::Search;
        } else if km.toggle_filters.matches(key_msg) {
            self.toggle_column_filters();
        } else if km.edit_filter.matches(key_msg) {
            self.start_column_filter_input();
        } else if km.filter_popup.matches(key_msg) {
            self.open_filter_popup();
        } else if km.column_menu.matches(key_msg) {
            self.open_column_menu();
        } else if km.data_menu.matches(key_msg) {
            self.open_data_menu();
        } else if km.export.matches(key_msg) {
            let _ = self.export(ExportFormat::Csv);
        } else if let Some(paginator) = self.paginator.as_mut() {
            if paginator.handle_key(key_msg) {
                let page = paginator.current_page;
                self.page_changed(page);
            }
        }
        None
    }

    fn handle_column_menu_key(&mut self, cursor: usize, key_msg: &KeyMsg) {
        let entries = self.columns.schema().len() + 1;
        let km = &self.keymap;
        if km.menu_close.matches(key_msg) || km.column_menu.matches(key_msg) {
            self.close_menu();
        } else if km.menu_up.matches(key_msg) {
            self.menu = Menu::Columns {
                cursor: cursor.saturating_sub(1),
            };
        } else if km.menu_down.matches(key_msg) {
            self.menu = Menu::Columns {
                cursor: (cursor + 1).min(entries - 1),
            };
        } else if km.menu_select.matches(key_msg) {
            if cursor == 0 {
                let show_all = !self.columns.all_visible();
                self.toggle_all_columns(show_all);
            } else if let Some(key) = self.schema_key(cursor - 1) {
                let _ = self.toggle_column(&key);
            }
        } else if km.move_column_up.matches(key_msg) && cursor > 1 {
            if let Some(key) = self.schema_key(cursor - 1) {
                if self.reorder_column(&key, MoveDirection::Up).is_some() {
                    self.menu = Menu::Columns { cursor: cursor - 1 };
                }
            }
        } else if km.move_column_down.matches(key_msg) && cursor > 0 {
            if let Some(key) = self.schema_key(cursor - 1) {
                if self.reorder_column(&key, MoveDirection::Down).is_some() {
                    self.menu = Menu::Columns { cursor: cursor + 1 };
                }
            }
        }
    }

    fn handle_data_menu_key(&mut self, cursor: usize, key_msg: &KeyMsg) -> Option<Cmd> {
        let actions = self.data_actions();
        let km = &self.keymap;
        if km.menu_close.matches(key_msg) || km.data_menu.matches(key_msg) {
            self.close_menu();
        } else if km.menu_up.matches(key_msg) {
            self.menu = Menu::Data {
                cursor: cursor.saturating_sub(1),
            };
        } else if km.menu_down.matches(key_msg) {
            self.menu = Menu::Data {
                cursor: (cursor + 1).min(actions.len().saturating_sub(1)),
            };
        } else if km.menu_select.matches(key_msg) {
            self.close_menu();
            match actions.get(cursor) {
                Some(DataAction::Export(format)) => {
                    let _ = self.export(*format);
                }
                Some(DataAction::Import) => {
                    return self.config.import_path.clone().map(|path| self.import_file(path));
                }
                None => {}
            }
        }
        None
    }
}

impl BubbleTeaModel for DataGrid {
    /// Creates an empty grid with no columns.
    fn init() -> (Self, Option<Cmd>) {
        (Self::empty(GridConfig::default()), None)
    }

    /// Handles keys and import file results.
    ///
    /// Keys go, in order of priority, to the cell editor, the search or
    /// column filter input, the filter popup, the open menu, and finally the
    /// grid's own bindings.
    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(file) = msg.downcast_ref::<ImportFileMsg>() {
            self.handle_import_file(file);
            return None;
        }
        if !self.focus {
            return None;
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key_msg);
        }
        None
    }

    fn view(&self) -> String {
        let mut sections = Vec::new();

        if self.config.show_toolbar {
            sections.push(self.view_toolbar());
        }

        let overlay = self.view_overlay();
        if !overlay.is_empty() {
            sections.push(overlay);
        }

        sections.push(self.view_table());

        if let Some(paginator) = &self.paginator {
            if paginator.total_pages > 1 {
                sections.push(self.view_pagination(paginator));
            }
        }

        let status = self.view_notifications();
        if !status.is_empty() {
            sections.push(status);
        }

        sections.join("\n")
    }
}

impl Component for DataGrid {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
        if self.editor.is_editing() {
            self.cancel_edit();
        }
        self.input_mode = InputMode::Normal;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
