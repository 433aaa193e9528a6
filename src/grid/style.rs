//! Styles for the data grid.
//!
//! All colours are adaptive, so the grid reads well on light and dark
//! terminals. Override any field to restyle one element:
//!
//! ```rust
//! use bubbletea_datagrid::grid::style::GridStyles;
//! use lipgloss_extras::prelude::*;
//!
//! let mut styles = GridStyles::default();
//! styles.header = Style::new().bold(true).underline(true);
//! ```

use lipgloss_extras::prelude::*;

/// Marker for ascending sort.
pub const SORT_ASCENDING: &str = "▲";
/// Marker for descending sort.
pub const SORT_DESCENDING: &str = "▼";
/// Marker for a sortable column that is not sorted.
pub const SORT_NONE: &str = "⇅";
/// Marker for mandatory columns.
pub const MANDATORY_MARKER: &str = "✓";
/// Toggle of a collapsed row.
pub const COLLAPSED: &str = "▸";
/// Toggle of an expanded row.
pub const EXPANDED: &str = "▾";
/// Character used to truncate text.
pub const ELLIPSIS: &str = "…";
/// Caret drawn at the end of edited text.
pub const CARET: &str = "▏";

/// Styles of every grid element.
#[derive(Debug, Clone)]
pub struct GridStyles {
    /// Toolbar title.
    pub title: Style,
    /// Row count badge next to the title.
    pub badge: Style,
    /// Search box.
    pub search: Style,
    /// Search placeholder.
    pub placeholder: Style,
    /// Toolbar state indicators.
    pub indicator: Style,
    /// Header cells.
    pub header: Style,
    /// Sort and mandatory markers in the header.
    pub header_marker: Style,
    /// Column filter line.
    pub filter_line: Style,
    /// Body cells.
    pub cell: Style,
    /// The row under the cursor.
    pub selected_row: Style,
    /// The cell under the cursor.
    pub selected_cell: Style,
    /// A cell being edited.
    pub editing_cell: Style,
    /// Labels in the nested panel.
    pub nested_label: Style,
    /// Values in the nested panel.
    pub nested_value: Style,
    /// The "No data found" placeholder.
    pub no_data: Style,
    /// Pagination line.
    pub pagination: Style,
    /// The current page link.
    pub active_page: Style,
    /// Disabled previous/next links.
    pub disabled_link: Style,
    /// Menu and popup frames.
    pub menu: Style,
    /// Menu title.
    pub menu_title: Style,
    /// The focused menu line.
    pub menu_cursor: Style,
    /// Locked menu entries.
    pub menu_locked: Style,
    /// Success notifications.
    pub success: Style,
    /// Informational notifications.
    pub info: Style,
    /// Warning notifications.
    pub warning: Style,
    /// Error notifications.
    pub error: Style,
}

impl Default for GridStyles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };
        let accent = AdaptiveColor {
            Light: "#1E5AA8",
            Dark: "#5B9BF0",
        };

        Self {
            title: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            badge: Style::new()
                .background(Color::from("62"))
                .foreground(Color::from("230")),
            search: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#ECFD65",
            }),
            placeholder: Style::new().foreground(subdued.clone()),
            indicator: Style::new().foreground(accent.clone()),
            header: Style::new().bold(true),
            header_marker: Style::new().foreground(accent.clone()),
            filter_line: Style::new().foreground(subdued.clone()),
            cell: Style::new(),
            selected_row: Style::new().foreground(AdaptiveColor {
                Light: "#EE6FF8",
                Dark: "#EE6FF8",
            }),
            selected_cell: Style::new().bold(true).underline(true),
            editing_cell: Style::new().background(Color::from("236")),
            nested_label: Style::new().foreground(subdued.clone()),
            nested_value: Style::new(),
            no_data: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
            pagination: Style::new(),
            active_page: Style::new().bold(true).foreground(accent.clone()),
            disabled_link: Style::new().foreground(subdued.clone()),
            menu: Style::new(),
            menu_title: Style::new().bold(true).foreground(accent),
            menu_cursor: Style::new().foreground(Color::from("170")),
            menu_locked: Style::new().foreground(subdued),
            success: Style::new().foreground(Color::from("42")),
            info: Style::new().foreground(Color::from("39")),
            warning: Style::new().foreground(Color::from("214")),
            error: Style::new().foreground(Color::from("196")),
        }
    }
}
