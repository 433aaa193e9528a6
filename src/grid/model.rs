//! State and operations of the data grid.

use super::api::{Callbacks, Handled};
use super::{DataAction, DataGrid, GridKeyMap, GridStyles, InputMode, Menu};
use crate::column::{prepare_columns, split_columns, Column, ColumnSplit, PreparedColumn};
use crate::config::GridConfig;
use crate::editor::{CellEditor, EditCommit, TextBuffer};
use crate::error::GridError;
use crate::filter_popup::{FilterPopup, FilterValues};
use crate::interchange::{self, ExportFormat, ImportFileMsg, CSV_MIME};
use crate::notify::{GridEvent, Notification};
use crate::paginator::Model as Paginator;
use crate::pipeline::{self, SortState};
use crate::value::{Row, Value};
use crate::visibility::{ColumnController, ColumnSchema, MoveDirection};
use bubbletea_rs::Cmd;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Notifications kept for [`DataGrid::notifications`].
const NOTIFICATION_HISTORY: usize = 16;

impl DataGrid {
    /// Creates a grid over `data`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DuplicateColumnKey`] when two columns share a key.
    pub fn new(columns: &[Column], data: Vec<Row>, config: GridConfig) -> Result<Self, GridError> {
        let prepared =
            prepare_columns(columns, &config.mandatory_columns, config.default_editable)?;
        let mut grid = Self::empty(config);
        grid.columns = ColumnController::new(prepared);
        grid.data = data;
        tracing::debug!(
            columns = columns.len(),
            rows = grid.data.len(),
            "data grid created"
        );
        Ok(grid)
    }

    pub(super) fn empty(config: GridConfig) -> Self {
        let paginator = config.pagination.map(|p| {
            let mut paginator = Paginator::new()
                .with_total_pages(p.total_pages)
                .with_window(config.page_window);
            paginator.set_page(p.current_page);
            paginator
        });

        Self {
            columns: ColumnController::new(Vec::new()),
            data: Vec::new(),
            popup: FilterPopup::new(config.filter_fields.clone()),
            config,
            sort: SortState::default(),
            sort_delegated: false,
            search: TextBuffer::default(),
            search_delegated: false,
            input_mode: InputMode::Normal,
            filter_input: TextBuffer::default(),
            column_filters: BTreeMap::new(),
            show_column_filters: false,
            popup_filters: FilterValues::new(),
            expanded_rows: BTreeMap::new(),
            paginator,
            cursor_row: 0,
            cursor_col: 0,
            editor: CellEditor::new(),
            menu: Menu::Closed,
            notifications: Vec::new(),
            callbacks: Callbacks::default(),
            sink: None,
            focus: true,
            keymap: GridKeyMap::default(),
            styles: GridStyles::default(),
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// All rows, in their original order.
    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Replaces the rows.
    ///
    /// Expanded rows are collapsed, any edit is cancelled and the grid returns
    /// to page 1, since row indices may now name different rows.
    pub fn set_data(&mut self, data: Vec<Row>) {
        self.cancel_edit();
        self.data = data;
        self.expanded_rows.clear();
        self.reset_page();
    }

    /// The configuration the grid was built with.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Column visibility and order.
    pub fn columns(&self) -> &ColumnController {
        &self.columns
    }

    /// Snapshot of every column in sequence order.
    pub fn schema(&self) -> ColumnSchema {
        self.columns.schema()
    }

    /// Visible columns split into main and nested columns.
    pub fn column_split(&self) -> ColumnSplit {
        split_columns(self.columns.ordered_visible(), self.config.max_visible_columns)
    }

    /// The active sort.
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// The search box text.
    pub fn search_text(&self) -> String {
        self.search.value()
    }

    /// Which input receives typed characters.
    pub fn input_mode(&self) -> &InputMode {
        &self.input_mode
    }

    /// Column filter values by column key.
    pub fn column_filters(&self) -> &BTreeMap<String, String> {
        &self.column_filters
    }

    /// Whether the column filter panel is shown.
    pub fn column_filters_shown(&self) -> bool {
        self.show_column_filters
    }

    /// Popup filter values the grid applies itself.
    pub fn popup_filters(&self) -> &FilterValues {
        &self.popup_filters
    }

    /// The filter popup.
    pub fn filter_popup(&self) -> &FilterPopup {
        &self.popup
    }

    /// The open menu.
    pub fn menu(&self) -> Menu {
        self.menu
    }

    /// The inline cell editor.
    pub fn editor(&self) -> &CellEditor {
        &self.editor
    }

    /// Recent notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// The newest notification.
    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Dismisses every notification.
    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Current page, starting at 1.
    pub fn current_page(&self) -> usize {
        self.paginator.as_ref().map_or(1, |p| p.current_page)
    }

    /// Number of pages; 1 without pagination.
    pub fn total_pages(&self) -> usize {
        self.paginator.as_ref().map_or(1, |p| p.total_pages)
    }

    /// Cursor as (row position on the page, main column position).
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    // ---------------------------------------------------------------------
    // Pipeline
    // ---------------------------------------------------------------------

    /// Indices of the rows that pass search and filters, in sort order.
    pub fn processed_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.data.len()).collect();

        if !self.search_delegated && !self.config.search_fields.is_empty() {
            indices = pipeline::search_rows(
                &self.data,
                indices,
                &self.search.value(),
                &self.config.search_fields,
            );
        }
        if self.show_column_filters {
            indices = pipeline::filter_rows(&self.data, indices, &self.column_filters);
        }
        indices = pipeline::filter_rows(&self.data, indices, &self.popup_filters);
        if !self.sort_delegated {
            indices = pipeline::sort_rows(&self.data, indices, &self.sort);
        }
        indices
    }

    /// Indices of the rows on the current page.
    pub fn page_indices(&self) -> Vec<usize> {
        let mut processed = self.processed_indices();
        if let Some(p) = &self.paginator {
            let range = pipeline::page_bounds(processed.len(), p.current_page, p.total_pages);
            processed.truncate(range.end);
            processed.drain(..range.start);
        }
        processed
    }

    // ---------------------------------------------------------------------
    // Sort and search
    // ---------------------------------------------------------------------

    /// Cycles the sort of `key`.
    ///
    /// Unsortable columns are left alone; unknown keys raise a warning.
    pub fn sort_by(&mut self, key: &str) {
        let sortable = match self.columns.column(key) {
            Some(column) => column.sortable,
            None => {
                self.notify_error(&GridError::UnknownColumn(key.to_string()));
                return;
            }
        };
        if sortable {
            let next = self.sort.next(key);
            self.set_sort_state(next);
        }
    }

    /// Replaces the sort and tells the sort hook.
    pub fn set_sort_state(&mut self, sort: SortState) {
        self.sort = sort;
        let handled = match self.callbacks.on_sort_change.as_mut() {
            Some(on_sort_change) => on_sort_change(&self.sort),
            None => Handled::No,
        };
        self.sort_delegated = handled == Handled::Yes;
        tracing::debug!(
            column = ?self.sort.column,
            direction = ?self.sort.direction,
            delegated = self.sort_delegated,
            "sort changed"
        );
        self.emit(GridEvent::SortChanged(self.sort.clone()));
    }

    /// Replaces the search text.
    pub fn set_search_text(&mut self, text: &str) {
        self.search.set_value(text);
        self.apply_search_text(text.to_string());
    }

    pub(super) fn apply_search_text(&mut self, text: String) {
        let handled = match self.callbacks.on_search.as_mut() {
            Some(on_search) => on_search(&text),
            None => Handled::No,
        };
        self.search_delegated = handled == Handled::Yes;
        tracing::debug!(text = %text, delegated = self.search_delegated, "search changed");
        self.emit(GridEvent::SearchChanged(text));
        self.reset_page();
    }

    // ---------------------------------------------------------------------
    // Filters
    // ---------------------------------------------------------------------

    /// Shows or hides the column filter panel.
    ///
    /// Showing the panel starts from empty filters.
    pub fn toggle_column_filters(&mut self) {
        self.show_column_filters = !self.show_column_filters;
        if self.show_column_filters {
            self.column_filters.clear();
        } else if matches!(self.input_mode, InputMode::ColumnFilter(_)) {
            self.input_mode = InputMode::Normal;
        }
        tracing::debug!(shown = self.show_column_filters, "column filters toggled");
        self.emit(GridEvent::ColumnFiltersToggled(self.show_column_filters));
        self.reset_page();
    }

    /// Sets the filter text of one column.
    pub fn set_column_filter(&mut self, key: &str, value: &str) {
        self.column_filters.insert(key.to_string(), value.to_string());
        tracing::debug!(column = key, value, "column filter changed");
        self.emit(GridEvent::ColumnFilterChanged {
            key: key.to_string(),
            value: value.to_string(),
        });
        self.reset_page();
    }

    pub(super) fn start_column_filter_input(&mut self) {
        if !self.show_column_filters {
            return;
        }
        let Some(column) = self.selected_column() else {
            return;
        };
        if !column.filterable {
            return;
        }
        let current = self
            .column_filters
            .get(&column.key)
            .map(String::as_str)
            .unwrap_or("");
        self.filter_input = TextBuffer::new(current);
        self.input_mode = InputMode::ColumnFilter(column.key);
    }

    /// Opens the filter popup when it has fields.
    pub fn open_filter_popup(&mut self) {
        if self.popup.has_fields() {
            self.popup.open();
        }
    }

    /// Applies filter popup values.
    ///
    /// When the filter hook takes over, the grid drops its own popup filters.
    pub fn apply_popup_filters(&mut self, values: FilterValues) {
        let handled = match self.callbacks.on_filter.as_mut() {
            Some(on_filter) => on_filter(&values),
            None => Handled::No,
        };
        self.popup_filters = match handled {
            Handled::Yes => FilterValues::new(),
            Handled::No => values,
        };
        self.popup.close();
        tracing::debug!(filters = ?self.popup_filters, "popup filters applied");
        self.emit(GridEvent::PopupFiltersApplied);
        self.reset_page();
    }

    // ---------------------------------------------------------------------
    // Columns
    // ---------------------------------------------------------------------

    /// Shows or hides a column.
    ///
    /// Rejections become a warning notification and are returned.
    pub fn toggle_column(&mut self, key: &str) -> Result<bool, GridError> {
        let result = self.columns.toggle_column(key);
        match &result {
            Ok(visible) => {
                tracing::debug!(column = key, visible, "column toggled");
                self.emit(GridEvent::ColumnToggled {
                    key: key.to_string(),
                    visible: *visible,
                });
                self.clamp_cursor();
            }
            Err(err) => self.notify_error(err),
        }
        result
    }

    /// Shows every column, or only the mandatory ones.
    pub fn toggle_all_columns(&mut self, show_all: bool) {
        self.columns.toggle_all_columns(show_all);
        tracing::debug!(show_all, "all columns toggled");
        self.emit(GridEvent::AllColumnsToggled(show_all));
        self.clamp_cursor();
    }

    /// Moves a column one place up or down in sequence order.
    pub fn reorder_column(&mut self, key: &str, direction: MoveDirection) -> Option<ColumnSchema> {
        let schema = self.columns.reorder_column(key, direction)?;
        self.columns_reordered(&schema);
        Some(schema)
    }

    /// Moves `source` to where `target` is.
    pub fn drag_reorder(&mut self, source: &str, target: &str) -> Option<ColumnSchema> {
        let schema = self.columns.drag_reorder(source, target)?;
        self.columns_reordered(&schema);
        Some(schema)
    }

    fn columns_reordered(&mut self, schema: &ColumnSchema) {
        let keys: Vec<String> = schema.keys().into_iter().map(str::to_string).collect();
        tracing::debug!(order = ?keys, "columns reordered");
        self.emit(GridEvent::ColumnsReordered(keys));
    }

    pub(super) fn schema_key(&self, position: usize) -> Option<String> {
        self.columns.schema().get(position).map(|c| c.key.clone())
    }

    // ---------------------------------------------------------------------
    // Rows, cursor and pages
    // ---------------------------------------------------------------------

    /// Expands or collapses a row; returns the new state.
    pub fn toggle_row_expanded(&mut self, row: usize) -> bool {
        if row >= self.data.len() {
            self.notify_error(&GridError::RowOutOfRange(row));
            return false;
        }
        let expanded = self.expanded_rows.entry(row).or_insert(false);
        *expanded = !*expanded;
        let expanded = *expanded;
        tracing::debug!(row, expanded, "row toggled");
        self.emit(GridEvent::RowExpanded { row, expanded });
        expanded
    }

    /// Whether a row shows its nested columns.
    pub fn is_row_expanded(&self, row: usize) -> bool {
        self.expanded_rows.get(&row).copied().unwrap_or(false)
    }

    /// Moves the row cursor by `delta`, staying on the page.
    pub fn move_cursor_row(&mut self, delta: isize) {
        let rows = self.page_indices().len();
        self.cursor_row = step(self.cursor_row, delta, rows);
    }

    /// Moves the column cursor by `delta`, staying on main columns.
    pub fn move_cursor_col(&mut self, delta: isize) {
        let columns = self.column_split().main.len();
        self.cursor_col = step(self.cursor_col, delta, columns);
    }

    /// Data index of the row under the cursor.
    pub fn selected_row_index(&self) -> Option<usize> {
        self.page_indices().get(self.cursor_row).copied()
    }

    /// Key of the column under the cursor.
    pub fn selected_column_key(&self) -> Option<String> {
        self.selected_column().map(|c| c.key)
    }

    fn selected_column(&self) -> Option<PreparedColumn> {
        self.column_split().main.get(self.cursor_col).cloned()
    }

    fn clamp_cursor(&mut self) {
        let rows = self.page_indices().len();
        let columns = self.column_split().main.len();
        self.cursor_row = self.cursor_row.min(rows.saturating_sub(1));
        self.cursor_col = self.cursor_col.min(columns.saturating_sub(1));
    }

    /// Goes to `page`, clamped to the page range.
    pub fn set_page(&mut self, page: usize) {
        let changed = self.paginator.as_mut().map(|p| p.set_page(page));
        if changed == Some(true) {
            self.page_changed(self.current_page());
        }
    }

    /// Goes to the next page.
    pub fn next_page(&mut self) {
        if self.paginator.as_mut().is_some_and(|p| p.next_page()) {
            self.page_changed(self.current_page());
        }
    }

    /// Goes to the previous page.
    pub fn prev_page(&mut self) {
        if self.paginator.as_mut().is_some_and(|p| p.prev_page()) {
            self.page_changed(self.current_page());
        }
    }

    /// Changes the page count, for callers that page on their side.
    pub fn set_total_pages(&mut self, total_pages: usize) {
        let before = self.current_page();
        match self.paginator.as_mut() {
            Some(p) => p.set_total_pages(total_pages),
            None => {
                self.paginator = Some(
                    Paginator::new()
                        .with_total_pages(total_pages)
                        .with_window(self.config.page_window),
                )
            }
        }
        if self.current_page() != before {
            self.page_changed(self.current_page());
        }
    }

    pub(super) fn page_changed(&mut self, page: usize) {
        self.cursor_row = 0;
        tracing::debug!(page, "page changed");
        if let Some(on_page_change) = self.callbacks.on_page_change.as_mut() {
            on_page_change(page);
        }
        self.emit(GridEvent::PageChanged(page));
    }

    fn reset_page(&mut self) {
        if self.paginator.as_mut().is_some_and(|p| p.set_page(1)) {
            self.page_changed(1);
        } else {
            self.clamp_cursor();
        }
    }

    // ---------------------------------------------------------------------
    // Editing
    // ---------------------------------------------------------------------

    /// Starts editing one cell.
    ///
    /// An edit already in progress is cancelled first.
    ///
    /// # Errors
    ///
    /// [`GridError::UnknownColumn`], [`GridError::NotEditable`],
    /// [`GridError::NoEditHandler`] or [`GridError::RowOutOfRange`]; each is
    /// also raised as a warning notification.
    pub fn begin_edit(&mut self, row: usize, key: &str) -> Result<(), GridError> {
        let result = self.try_begin_edit(row, key);
        if let Err(err) = &result {
            self.notify_error(err);
        }
        result
    }

    fn try_begin_edit(&mut self, row: usize, key: &str) -> Result<(), GridError> {
        let column = self
            .columns
            .column(key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))?;
        if !column.inline_editable() {
            return Err(GridError::NotEditable(column.header.clone()));
        }
        if !self.has_edit_handler() {
            return Err(GridError::NoEditHandler);
        }
        let current = self
            .data
            .get(row)
            .ok_or(GridError::RowOutOfRange(row))?
            .display(key);

        if self.editor.begin(row, key, &current).is_some() {
            self.emit(GridEvent::EditCancelled);
        }
        tracing::debug!(row, column = key, "edit started");
        self.emit(GridEvent::EditStarted {
            row,
            key: key.to_string(),
        });
        Ok(())
    }

    /// Discards the edit in progress.
    pub fn cancel_edit(&mut self) {
        if self.editor.is_editing() {
            self.editor.cancel();
            tracing::debug!("edit cancelled");
            self.emit(GridEvent::EditCancelled);
        }
    }

    /// Commits the edit in progress through the row-edit hook.
    ///
    /// # Errors
    ///
    /// A failure reported by the hook, as [`GridError::Callback`].
    pub fn commit_edit(&mut self) -> Result<(), GridError> {
        match self.editor.commit() {
            Some(commit) => self.finish_edit(commit),
            None => Ok(()),
        }
    }

    pub(super) fn finish_edit(&mut self, commit: EditCommit) -> Result<(), GridError> {
        let kind = self
            .columns
            .column(&commit.key)
            .map(|c| c.kind)
            .unwrap_or_default();
        let value = kind.parse(&commit.text);

        let result = match self.callbacks.on_row_edit.as_mut() {
            Some(on_row_edit) => on_row_edit(commit.row, &commit.key, &value)
                .map_err(|e| GridError::Callback(format!("Failed to update cell: {}", e))),
            None => Err(GridError::NoEditHandler),
        };

        match result {
            Ok(()) => {
                tracing::debug!(row = commit.row, column = %commit.key, "edit committed");
                self.emit(GridEvent::EditCommitted {
                    row: commit.row,
                    key: commit.key,
                    value,
                });
                Ok(())
            }
            Err(err) => {
                self.notify_error(&err);
                Err(err)
            }
        }
    }

    /// Writes a value into the grid's own data.
    ///
    /// # Errors
    ///
    /// [`GridError::RowOutOfRange`] when `row` does not exist.
    pub fn apply_edit(&mut self, row: usize, key: &str, value: Value) -> Result<(), GridError> {
        let target = self.data.get_mut(row).ok_or(GridError::RowOutOfRange(row))?;
        target.set(key, value);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Menus, import and export
    // ---------------------------------------------------------------------

    /// Opens the column menu.
    pub fn open_column_menu(&mut self) {
        self.menu = Menu::Columns { cursor: 0 };
    }

    /// Opens the data menu.
    pub fn open_data_menu(&mut self) {
        self.menu = Menu::Data { cursor: 0 };
    }

    /// Closes any open menu.
    pub fn close_menu(&mut self) {
        self.menu = Menu::Closed;
    }

    /// Entries of the data menu.
    pub fn data_actions(&self) -> Vec<DataAction> {
        let mut actions = vec![
            DataAction::Export(ExportFormat::Csv),
            DataAction::Export(ExportFormat::Excel),
            DataAction::Export(ExportFormat::Pdf),
        ];
        if self.config.import_path.is_some() {
            actions.push(DataAction::Import);
        }
        actions
    }

    /// Exports every row in `format`.
    ///
    /// The export hook is asked first. Otherwise CSV is written to the file
    /// sink; other formats are not supported natively.
    ///
    /// # Errors
    ///
    /// Any failure, also raised as an error notification.
    pub fn export(&mut self, format: ExportFormat) -> Result<(), GridError> {
        let handled = match self.callbacks.on_export.as_mut() {
            Some(on_export) => on_export(format),
            None => Handled::No,
        };
        if handled == Handled::Yes {
            tracing::debug!(%format, "export handled by caller");
            return Ok(());
        }

        match self.write_export(format) {
            Ok((file_name, rows)) => {
                tracing::info!(%format, file = %file_name, rows, "export written");
                self.notify(Notification::success(format!("{} exported successfully", format)));
                self.emit(GridEvent::Exported {
                    format,
                    file_name,
                    rows,
                });
                Ok(())
            }
            Err(err) => {
                tracing::error!(%format, error = %err, "export failed");
                let message = match &err {
                    GridError::UnsupportedExportFormat(_) => err.to_string(),
                    _ => format!("Failed to export {}: {}", format, err),
                };
                self.notify(Notification::error(message));
                Err(err)
            }
        }
    }

    fn write_export(&mut self, format: ExportFormat) -> Result<(String, usize), GridError> {
        if format != ExportFormat::Csv {
            return Err(GridError::UnsupportedExportFormat(format));
        }
        if self.data.is_empty() {
            return Err(GridError::NoDataToExport);
        }
        let columns: Vec<PreparedColumn> = self.column_split().all().cloned().collect();
        let csv = interchange::write_csv(&columns, &self.data);
        let file_name = interchange::export_file_name(
            &self.config.export_file_stem,
            chrono::Local::now().date_naive(),
        );
        let sink = self.sink.as_mut().ok_or(GridError::NoFileSink)?;
        sink.save(&file_name, CSV_MIME, &csv)?;
        Ok((file_name, self.data.len()))
    }

    /// Reads a CSV file in the background; the grid imports it when the
    /// resulting message reaches [`update`](bubbletea_rs::Model::update).
    pub fn import_file(&self, path: impl Into<PathBuf>) -> Cmd {
        interchange::read_import_file(path)
    }

    pub(super) fn handle_import_file(&mut self, file: &ImportFileMsg) {
        match &file.result {
            Ok(text) => {
                tracing::debug!(file = %file.name, "import file read");
                let _ = self.import_csv(text);
            }
            Err(err) => self.notify_error(err),
        }
    }

    /// Imports CSV text; returns the number of rows.
    ///
    /// Rows go to the import hook, or are appended to the data without one.
    ///
    /// # Errors
    ///
    /// Parse failures and hook failures, also raised as an error notification.
    /// Nothing is imported on failure.
    pub fn import_csv(&mut self, text: &str) -> Result<usize, GridError> {
        let result = self.try_import(text);
        match &result {
            Ok(count) => {
                tracing::info!(rows = count, "import complete");
                self.notify(Notification::success(format!("Imported {} rows", count)));
                self.emit(GridEvent::Imported(*count));
            }
            Err(err) => self.notify_error(err),
        }
        result
    }

    fn try_import(&mut self, text: &str) -> Result<usize, GridError> {
        let columns = self.columns.schema().to_vec();
        let rows = interchange::parse_csv(text, &columns)?;
        let count = rows.len();
        match self.callbacks.on_import.as_mut() {
            Some(on_import) => on_import(rows).map_err(GridError::Callback)?,
            None => {
                self.data.extend(rows);
                self.reset_page();
            }
        }
        Ok(count)
    }

    // ---------------------------------------------------------------------
    // Notifications
    // ---------------------------------------------------------------------

    /// Raises a notification.
    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification.clone());
        if self.notifications.len() > NOTIFICATION_HISTORY {
            let excess = self.notifications.len() - NOTIFICATION_HISTORY;
            self.notifications.drain(..excess);
        }
        self.emit(GridEvent::Notified(notification));
    }

    fn notify_error(&mut self, err: &GridError) {
        if err.is_user_input() {
            tracing::warn!(error = %err, "action rejected");
        } else {
            tracing::error!(error = %err, "operation failed");
        }
        self.notify(Notification::from(err));
    }
}

fn step(position: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    position.saturating_add_signed(delta).min(len - 1)
}
