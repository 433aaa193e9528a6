//! Key bindings for grid navigation and actions.
//!
//! ## Navigation
//!
//! - **Rows**: `↑/k`, `↓/j`
//! - **Columns**: `←/h`, `→/l`
//! - **Pages**: `pgup/[`, `pgdn/]` (bindings live on the paginator)
//!
//! ## Actions
//!
//! - **Sort** the selected column: `s`
//! - **Expand** the selected row: `space`
//! - **Edit** the selected cell: `enter/e`
//! - **Search**: `/`
//! - **Column filters** panel: `f`, then `tab` to type the selected column's
//!   filter; **filter popup**: `p`
//! - **Column menu**: `c`; **data menu**: `m`; **export CSV**: `x`
//!
//! ## Column menu
//!
//! `↑/↓` move, `space/enter` toggle, `K/J` move the column up or down,
//! `esc/c` close.

use crate::key::{self, KeyMap};

/// Key bindings of the grid in its normal mode.
#[derive(Debug, Clone)]
pub struct GridKeyMap {
    /// Select the previous row.
    pub row_up: key::Binding,
    /// Select the next row.
    pub row_down: key::Binding,
    /// Select the previous column.
    pub column_left: key::Binding,
    /// Select the next column.
    pub column_right: key::Binding,
    /// Cycle the sort of the selected column.
    pub sort: key::Binding,
    /// Expand or collapse the selected row.
    pub expand: key::Binding,
    /// Edit the selected cell.
    pub edit: key::Binding,
    /// Start typing a search.
    pub search: key::Binding,
    /// Leave the search box.
    pub search_done: key::Binding,
    /// Show or hide the column filter panel.
    pub toggle_filters: key::Binding,
    /// Type into the selected column's filter while the panel is shown.
    pub edit_filter: key::Binding,
    /// Open the filter popup.
    pub filter_popup: key::Binding,
    /// Open the column menu.
    pub column_menu: key::Binding,
    /// Open the data menu.
    pub data_menu: key::Binding,
    /// Export the grid as CSV.
    pub export: key::Binding,
    /// Move the menu cursor up.
    pub menu_up: key::Binding,
    /// Move the menu cursor down.
    pub menu_down: key::Binding,
    /// Activate the menu entry.
    pub menu_select: key::Binding,
    /// Move the column under the menu cursor up.
    pub move_column_up: key::Binding,
    /// Move the column under the menu cursor down.
    pub move_column_down: key::Binding,
    /// Close the open menu.
    pub menu_close: key::Binding,
}

impl Default for GridKeyMap {
    fn default() -> Self {
        Self {
            row_up: key::new_binding(vec![
                key::with_keys_str(&["up", "k"]),
                key::with_help("↑/k", "up"),
            ]),
            row_down: key::new_binding(vec![
                key::with_keys_str(&["down", "j"]),
                key::with_help("↓/j", "down"),
            ]),
            column_left: key::new_binding(vec![
                key::with_keys_str(&["left", "h"]),
                key::with_help("←/h", "left"),
            ]),
            column_right: key::new_binding(vec![
                key::with_keys_str(&["right", "l"]),
                key::with_help("→/l", "right"),
            ]),
            sort: key::new_binding(vec![
                key::with_keys_str(&["s"]),
                key::with_help("s", "sort"),
            ]),
            expand: key::new_binding(vec![
                key::with_keys_str(&["space"]),
                key::with_help("space", "expand"),
            ]),
            edit: key::new_binding(vec![
                key::with_keys_str(&["enter", "e"]),
                key::with_help("enter/e", "edit cell"),
            ]),
            search: key::new_binding(vec![
                key::with_keys_str(&["/"]),
                key::with_help("/", "search"),
            ]),
            search_done: key::new_binding(vec![
                key::with_keys_str(&["enter", "esc"]),
                key::with_help("enter/esc", "done"),
            ]),
            toggle_filters: key::new_binding(vec![
                key::with_keys_str(&["f"]),
                key::with_help("f", "column filters"),
            ]),
            edit_filter: key::new_binding(vec![
                key::with_keys_str(&["tab"]),
                key::with_help("tab", "filter column"),
            ]),
            filter_popup: key::new_binding(vec![
                key::with_keys_str(&["p"]),
                key::with_help("p", "filter"),
            ]),
            column_menu: key::new_binding(vec![
                key::with_keys_str(&["c"]),
                key::with_help("c", "columns"),
            ]),
            data_menu: key::new_binding(vec![
                key::with_keys_str(&["m"]),
                key::with_help("m", "import/export"),
            ]),
            export: key::new_binding(vec![
                key::with_keys_str(&["x"]),
                key::with_help("x", "export csv"),
            ]),
            menu_up: key::new_binding(vec![
                key::with_keys_str(&["up", "k"]),
                key::with_help("↑/k", "up"),
            ]),
            menu_down: key::new_binding(vec![
                key::with_keys_str(&["down", "j"]),
                key::with_help("↓/j", "down"),
            ]),
            menu_select: key::new_binding(vec![
                key::with_keys_str(&["space", "enter"]),
                key::with_help("space", "toggle"),
            ]),
            move_column_up: key::new_binding(vec![
                key::with_keys_str(&["K"]),
                key::with_help("K", "move up"),
            ]),
            move_column_down: key::new_binding(vec![
                key::with_keys_str(&["J"]),
                key::with_help("J", "move down"),
            ]),
            menu_close: key::new_binding(vec![
                key::with_keys_str(&["esc"]),
                key::with_help("esc", "close"),
            ]),
        }
    }
}

impl KeyMap for GridKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.row_up,
            &self.row_down,
            &self.sort,
            &self.edit,
            &self.search,
            &self.column_menu,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![&self.row_up, &self.row_down, &self.column_left, &self.column_right],
            vec![&self.sort, &self.expand, &self.edit],
            vec![&self.search, &self.toggle_filters, &self.edit_filter, &self.filter_popup],
            vec![&self.column_menu, &self.data_menu, &self.export],
        ]
    }
}
