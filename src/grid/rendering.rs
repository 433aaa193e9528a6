//! View rendering for the data grid.
//!
//! Every cell is padded or truncated to its column width in display cells,
//! so wide characters and emoji keep columns aligned.

use super::style::{
    CARET, COLLAPSED, ELLIPSIS, EXPANDED, MANDATORY_MARKER, SORT_ASCENDING, SORT_DESCENDING,
    SORT_NONE,
};
use super::{DataAction, DataGrid, InputMode, Menu};
use crate::column::{FilterType, PreparedColumn};
use crate::editor::TextBuffer;
use crate::key::Binding;
use crate::notify::Level;
use crate::paginator::{Model as Paginator, PageLink};
use crate::pipeline::SortDirection;
use lipgloss_extras::prelude::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of the expand toggle column.
const EXPAND_WIDTH: usize = 2;
const MIN_COLUMN_WIDTH: usize = 3;
const NO_DATA: &str = "No data found";

/// Pads or truncates `text` to exactly `width` display cells, ending
/// truncated text with `…`.
pub(crate) fn fit(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out.push_str(&" ".repeat(budget - used));
    out
}

fn center(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        return fit(text, width);
    }
    let left = (width - text_width) / 2;
    format!(
        "{}{}{}",
        " ".repeat(left),
        text,
        " ".repeat(width - text_width - left)
    )
}

fn with_caret(buffer: &TextBuffer) -> String {
    let (before, at, after) = buffer.split_at_caret();
    format!("{}{}{}{}", before, CARET, at.unwrap_or(""), after)
}

fn hint(binding: &Binding) -> String {
    format!("{} {}", binding.help().key, binding.help().desc)
}

impl DataGrid {
    /// Display width of each main column.
    ///
    /// A width hint is a percentage of the grid width; unhinted columns share
    /// what remains evenly.
    pub(super) fn column_widths(&self, columns: &[PreparedColumn], expand: bool) -> Vec<usize> {
        let total = self.config.width;
        let gaps = columns.len().saturating_sub(1) + if expand { EXPAND_WIDTH + 1 } else { 0 };
        let available = total.saturating_sub(gaps);

        let hinted: Vec<Option<usize>> = columns
            .iter()
            .map(|c| c.width.map(|percent| total * usize::from(percent) / 100))
            .collect();
        let used: usize = hinted.iter().flatten().sum();
        let unhinted = hinted.iter().filter(|h| h.is_none()).count();
        let share = if unhinted == 0 {
            0
        } else {
            available.saturating_sub(used) / unhinted
        };

        hinted
            .into_iter()
            .map(|h| h.unwrap_or(share).max(MIN_COLUMN_WIDTH))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Toolbar
    // ---------------------------------------------------------------------

    pub(super) fn view_toolbar(&self) -> String {
        let mut parts = Vec::new();
        if !self.config.title.is_empty() {
            parts.push(self.styles.title.clone().render(&self.config.title));
        }
        let count = self
            .config
            .count
            .unwrap_or_else(|| self.processed_indices().len());
        parts.push(self.styles.badge.clone().render(&format!(" {} ", count)));
        parts.push(self.view_search());

        let indicators = self.indicators();
        if !indicators.is_empty() {
            parts.push(self.styles.indicator.clone().render(&indicators.join(" · ")));
        }
        parts.join("  ")
    }

    fn view_search(&self) -> String {
        if self.input_mode == InputMode::Search {
            self.styles
                .search
                .clone()
                .render(&format!("/ {}", with_caret(&self.search)))
        } else if self.search.is_empty() {
            self.styles.placeholder.clone().render("/ Search")
        } else {
            self.styles
                .search
                .clone()
                .render(&format!("/ {}", self.search.value()))
        }
    }

    fn indicators(&self) -> Vec<String> {
        let mut out = Vec::new();

        if let Some(key) = &self.sort.column {
            let arrow = match self.sort.direction {
                SortDirection::Ascending => Some(SORT_ASCENDING),
                SortDirection::Descending => Some(SORT_DESCENDING),
                SortDirection::None => None,
            };
            if let (Some(arrow), Some(column)) = (arrow, self.columns.column(key)) {
                out.push(format!("{} {}", column.header, arrow));
            }
        }
        if self.show_column_filters {
            out.push("column filters".to_string());
        }
        match self.popup_filters.len() {
            0 => {}
            1 => out.push("1 filter".to_string()),
            n => out.push(format!("{} filters", n)),
        }
        if self.popup.is_open() {
            out.push("filter popup".to_string());
        }
        match self.menu {
            Menu::Columns { .. } => out.push("column menu".to_string()),
            Menu::Data { .. } => out.push("data menu".to_string()),
            Menu::Closed => {}
        }
        out
    }

    // ---------------------------------------------------------------------
    // Overlays
    // ---------------------------------------------------------------------

    pub(super) fn view_overlay(&self) -> String {
        if self.popup.is_open() {
            return self.view_filter_popup();
        }
        match self.menu {
            Menu::Columns { cursor } => self.view_column_menu(cursor),
            Menu::Data { cursor } => self.view_data_menu(cursor),
            Menu::Closed => String::new(),
        }
    }

    fn menu_line(&self, focused: bool, text: &str) -> String {
        if focused {
            self.styles.menu_cursor.clone().render(&format!("> {}", text))
        } else {
            self.styles.menu.clone().render(&format!("  {}", text))
        }
    }

    fn view_column_menu(&self, cursor: usize) -> String {
        let km = &self.keymap;
        let mut lines = vec![self.styles.menu_title.clone().render("Columns")];

        let all = if self.columns.all_visible() { "[x]" } else { "[ ]" };
        lines.push(self.menu_line(cursor == 0, &format!("{} All columns", all)));

        for (i, column) in self.columns.schema().iter().enumerate() {
            let check = if self.columns.is_visible(&column.key) {
                "[x]"
            } else {
                "[ ]"
            };
            let focused = cursor == i + 1;
            if column.mandatory {
                let text = format!("{} {} {}", check, column.header, MANDATORY_MARKER);
                if focused {
                    lines.push(self.menu_line(true, &text));
                } else {
                    lines.push(self.styles.menu_locked.clone().render(&format!("  {}", text)));
                }
            } else {
                lines.push(self.menu_line(focused, &format!("{} {}", check, column.header)));
            }
        }

        lines.push(self.styles.placeholder.clone().render(&[
            hint(&km.menu_select),
            hint(&km.move_column_up),
            hint(&km.move_column_down),
            hint(&km.menu_close),
        ]
        .join(" · ")));
        lines.join("\n")
    }

    fn view_filter_popup(&self) -> String {
        let km = &self.popup.keymap;
        let mut lines = vec![self.styles.menu_title.clone().render("Filters")];

        for (i, field) in self.popup.fields().iter().enumerate() {
            let focused = i == self.popup.focus();
            let current = self.popup.value(&field.name);
            let value = match field.field_type {
                FilterType::Select => {
                    let mut choices = vec![("All", current.is_empty())];
                    choices.extend(
                        field
                            .options
                            .iter()
                            .map(|o| (o.label.as_str(), !current.is_empty() && o.value == current)),
                    );
                    choices
                        .into_iter()
                        .map(|(label, chosen)| {
                            if chosen {
                                format!("[{}]", label)
                            } else {
                                label.to_string()
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(" ")
                }
                FilterType::Text | FilterType::Date => {
                    if focused {
                        with_caret(self.popup.input())
                    } else if current.is_empty() {
                        self.styles.placeholder.clone().render(&field.placeholder())
                    } else {
                        current.to_string()
                    }
                }
            };
            lines.push(self.menu_line(focused, &format!("{}: {}", field.label, value)));
        }

        lines.push(
            self.styles
                .placeholder
                .clone()
                .render(&[hint(&km.apply), hint(&km.reset), hint(&km.close)].join(" · ")),
        );
        lines.join("\n")
    }

    fn view_data_menu(&self, cursor: usize) -> String {
        let mut lines = vec![self.styles.menu_title.clone().render("Data")];
        for (i, action) in self.data_actions().iter().enumerate() {
            let label = match action {
                DataAction::Export(format) => format!("Export {}", format),
                DataAction::Import => {
                    let file = self
                        .config
                        .import_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    format!("Import CSV ({})", file)
                }
            };
            lines.push(self.menu_line(i == cursor, &label));
        }
        lines.join("\n")
    }

    // ---------------------------------------------------------------------
    // Table
    // ---------------------------------------------------------------------

    pub(super) fn view_table(&self) -> String {
        let split = self.column_split();
        let expand = split.has_nested();
        let widths = self.column_widths(&split.main, expand);

        let mut lines = vec![self.view_header(&split.main, &widths, expand)];
        if self.show_column_filters {
            lines.push(self.view_filter_line(&split.main, &widths, expand));
        }

        let rows = self.page_indices();
        if rows.is_empty() {
            let span = widths.iter().sum::<usize>()
                + widths.len().saturating_sub(1)
                + if expand { EXPAND_WIDTH + 1 } else { 0 };
            lines.push(self.styles.no_data.clone().render(&center(NO_DATA, span)));
            return lines.join("\n");
        }

        for (position, &row) in rows.iter().enumerate() {
            let selected = position == self.cursor_row;
            lines.push(self.view_row(row, selected, &split.main, &widths, expand));
            if expand && self.is_row_expanded(row) {
                lines.extend(self.view_nested(row, &split.nested));
            }
        }
        lines.join("\n")
    }

    fn header_markers(&self, column: &PreparedColumn) -> String {
        let mut markers = String::new();
        if column.mandatory {
            markers.push(' ');
            markers.push_str(MANDATORY_MARKER);
        }
        if column.sortable {
            markers.push(' ');
            markers.push_str(match self.sort.direction_for(&column.key) {
                SortDirection::Ascending => SORT_ASCENDING,
                SortDirection::Descending => SORT_DESCENDING,
                SortDirection::None => SORT_NONE,
            });
        }
        markers
    }

    fn view_header(&self, columns: &[PreparedColumn], widths: &[usize], expand: bool) -> String {
        let mut cells = Vec::new();
        if expand {
            cells.push(" ".repeat(EXPAND_WIDTH));
        }
        for (column, &width) in columns.iter().zip(widths) {
            let markers = self.header_markers(column);
            let label_width = width.saturating_sub(markers.width());
            let label = if column.header.width() <= label_width {
                column.header.clone()
            } else {
                fit(&column.header, label_width)
            };
            let padding = width.saturating_sub(label.width() + markers.width());
            cells.push(format!(
                "{}{}{}",
                self.styles.header.clone().render(&label),
                self.styles.header_marker.clone().render(&markers),
                " ".repeat(padding)
            ));
        }
        cells.join(" ")
    }

    fn view_filter_line(
        &self,
        columns: &[PreparedColumn],
        widths: &[usize],
        expand: bool,
    ) -> String {
        let mut cells = Vec::new();
        if expand {
            cells.push(" ".repeat(EXPAND_WIDTH));
        }
        for (column, &width) in columns.iter().zip(widths) {
            if !column.filterable {
                cells.push(" ".repeat(width));
                continue;
            }
            let editing =
                matches!(&self.input_mode, InputMode::ColumnFilter(key) if *key == column.key);
            let value = self
                .column_filters
                .get(&column.key)
                .map(String::as_str)
                .unwrap_or("");
            let text = if editing {
                with_caret(&self.filter_input)
            } else if value.is_empty() {
                match column.filter_type {
                    FilterType::Select => "All".to_string(),
                    FilterType::Text | FilterType::Date => format!("{}…", column.header),
                }
            } else {
                value.to_string()
            };
            cells.push(self.styles.filter_line.clone().render(&fit(&text, width)));
        }
        cells.join(" ")
    }

    fn view_row(
        &self,
        row: usize,
        selected: bool,
        columns: &[PreparedColumn],
        widths: &[usize],
        expand: bool,
    ) -> String {
        let Some(data) = self.data.get(row) else {
            return String::new();
        };
        let row_style = if selected {
            &self.styles.selected_row
        } else {
            &self.styles.cell
        };

        let mut cells = Vec::new();
        if expand {
            let toggle = if self.is_row_expanded(row) {
                EXPANDED
            } else {
                COLLAPSED
            };
            cells.push(row_style.clone().render(&fit(toggle, EXPAND_WIDTH)));
        }
        for (i, (column, &width)) in columns.iter().zip(widths).enumerate() {
            let cell = if self.editor.is_editing_cell(row, &column.key) {
                self.styles
                    .editing_cell
                    .clone()
                    .render(&fit(&with_caret(self.editor.buffer()), width))
            } else {
                let text = fit(&column.render_cell(data), width);
                if selected && i == self.cursor_col {
                    self.styles.selected_cell.clone().render(&text)
                } else {
                    row_style.clone().render(&text)
                }
            };
            cells.push(cell);
        }
        cells.join(" ")
    }

    fn view_nested(&self, row: usize, nested: &[PreparedColumn]) -> Vec<String> {
        let Some(data) = self.data.get(row) else {
            return Vec::new();
        };
        let indent = " ".repeat(EXPAND_WIDTH + 1);
        nested
            .iter()
            .map(|column| {
                let value = if self.editor.is_editing_cell(row, &column.key) {
                    self.styles
                        .editing_cell
                        .clone()
                        .render(&with_caret(self.editor.buffer()))
                } else {
                    self.styles
                        .nested_value
                        .clone()
                        .render(&column.render_cell(data))
                };
                format!(
                    "{}{} {}",
                    indent,
                    self.styles
                        .nested_label
                        .clone()
                        .render(&format!("{}:", column.header)),
                    value
                )
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Footer
    // ---------------------------------------------------------------------

    pub(super) fn view_pagination(&self, paginator: &Paginator) -> String {
        let link = |enabled: bool| {
            if enabled {
                self.styles.pagination.clone()
            } else {
                self.styles.disabled_link.clone()
            }
        };
        paginator
            .links()
            .into_iter()
            .map(|l| match l {
                PageLink::Prev { enabled } => link(enabled).render("‹ prev"),
                PageLink::Page {
                    number,
                    active: true,
                } => self
                    .styles
                    .active_page
                    .clone()
                    .render(&format!("[{}]", number)),
                PageLink::Page { number, .. } => {
                    self.styles.pagination.clone().render(&number.to_string())
                }
                PageLink::Ellipsis => self.styles.pagination.clone().render(ELLIPSIS),
                PageLink::Next { enabled } => link(enabled).render("next ›"),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(super) fn view_notifications(&self) -> String {
        let Some(notification) = self.notifications.last() else {
            return String::new();
        };
        let style = match notification.level {
            Level::Success => &self.styles.success,
            Level::Info => &self.styles.info,
            Level::Warning => &self.styles.warning,
            Level::Error => &self.styles.error,
        };
        style.clone().render(&notification.message)
    }
}
