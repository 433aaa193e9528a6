//! Tests for the data grid component.

use super::*;
use crate::column::{Column, FilterOption, FilterType};
use crate::config::Pagination;
use crate::error::GridError;
use crate::filter_popup::FilterField;
use crate::interchange::{MemorySink, CSV_MIME};
use crate::notify::{GridEvent, Level};
use crate::pipeline::SortDirection;
use crate::value::{Value, ValueKind};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss::strip_ansi;
use std::sync::{Arc, Mutex};

fn key_msg(code: KeyCode) -> Msg {
    let modifiers = match code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => KeyModifiers::SHIFT,
        _ => KeyModifiers::NONE,
    };
    Box::new(KeyMsg {
        key: code,
        modifiers,
    })
}

fn press(grid: &mut DataGrid, code: KeyCode) -> Option<Cmd> {
    grid.update(key_msg(code))
}

fn press_char(grid: &mut DataGrid, c: char) {
    press(grid, KeyCode::Char(c));
}

fn type_text(grid: &mut DataGrid, text: &str) {
    for c in text.chars() {
        press_char(grid, c);
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bill(
    id: &str,
    day: NaiveDate,
    status: &str,
    customer: &str,
    reference: &str,
    amount: f64,
) -> Row {
    Row::new()
        .with("id", id)
        .with("date", day)
        .with("status", Value::Enum(status.to_string()))
        .with("customerSupplier", customer)
        .with("customerSupplierRef", reference)
        .with("totalNetAmount", amount)
        .with("lineNo", "401")
}

fn bills() -> Vec<Row> {
    vec![
        bill(
            "QB/00001/2023",
            date(2023, 3, 12),
            "Under Amendment",
            "Orits Group",
            "CSR/11/2024",
            1395.0,
        ),
        bill("QB/00001/2024", date(2024, 3, 12), "Fresh", "Orits Group", "CSR/11/2024", 1200.0),
        bill("QB/00002/2024", date(2024, 4, 2), "Confirmed", "Nordrail AG", "NR/02/2024", 980.5),
        bill(
            "QB/00003/2024",
            date(2024, 5, 20),
            "Fresh",
            "Cargo Link, \"North\"",
            "CL/07/2023",
            450.0,
        ),
        bill("QB/00004/2024", date(2024, 6, 1), "Confirmed", "Orits Group", "CSR/12/2024", 2100.0),
    ]
}

fn bill_columns() -> Vec<Column> {
    vec![
        Column::new("id", "Bill No"),
        Column::new("date", "Bill Date").with_kind(ValueKind::Date),
        Column::new("status", "Status")
            .filterable(true)
            .with_filter_type(FilterType::Select)
            .with_filter_options(vec![
                FilterOption::new("Fresh", "Fresh"),
                FilterOption::new("Confirmed", "Confirmed"),
            ])
            .with_kind(ValueKind::Enum),
        Column::new("customerSupplier", "Customer/Supplier").filterable(true),
        Column::new("customerSupplierRef", "Customer Ref").filterable(true),
        Column::new("totalNetAmount", "Total Net Amount").with_kind(ValueKind::Number),
        Column::new("lineNo", "Line No"),
    ]
}

fn bill_config() -> GridConfig {
    GridConfig::default()
        .with_title("Bills")
        .with_mandatory_columns(&["id"])
        .with_search_fields(&["id", "customerSupplier", "customerSupplierRef"])
        .with_export_file_stem("bills")
}

fn grid() -> DataGrid {
    DataGrid::new(&bill_columns(), bills(), bill_config()).unwrap()
}

fn record_events(grid: DataGrid) -> (DataGrid, Arc<Mutex<Vec<GridEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let grid = grid.with_event_hook(move |e| sink.lock().unwrap().push(e.clone()));
    (grid, events)
}

fn view(grid: &DataGrid) -> String {
    strip_ansi(&grid.view())
}

#[test]
fn test_new_rejects_duplicate_keys() {
    let columns = vec![Column::new("id", "Id"), Column::new("id", "Other")];
    let err = DataGrid::new(&columns, Vec::new(), GridConfig::default()).unwrap_err();
    assert!(matches!(err, GridError::DuplicateColumnKey(k) if k == "id"));
}

#[test]
fn test_init_renders_placeholder() {
    let (grid, cmd) = DataGrid::init();
    assert!(cmd.is_none());
    assert!(view(&grid).contains("No data found"));
}

// -------------------------------------------------------------------------
// Search
// -------------------------------------------------------------------------

#[test]
fn test_search_by_customer_reference() {
    let mut g = grid();
    g.set_search_text("CSR/11/2024");
    assert_eq!(g.processed_indices(), vec![0, 1]);

    g.set_search_text("csr/1");
    assert_eq!(g.processed_indices(), vec![0, 1, 4]);

    g.set_search_text("");
    assert_eq!(g.processed_indices(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_search_through_keys() {
    let (mut g, events) = record_events(grid());
    press_char(&mut g, '/');
    assert_eq!(g.input_mode(), &InputMode::Search);

    // Navigation letters are typed, not interpreted.
    type_text(&mut g, "nordrail");
    assert_eq!(g.search_text(), "nordrail");
    assert_eq!(g.cursor(), (0, 0));

    press(&mut g, KeyCode::Enter);
    assert_eq!(g.input_mode(), &InputMode::Normal);
    assert_eq!(g.processed_indices(), vec![2]);
    assert!(view(&g).contains("/ nordrail"));

    let events = events.lock().unwrap();
    assert!(events.contains(&GridEvent::SearchChanged("nordrail".to_string())));
}

#[test]
fn test_search_taken_over_by_caller() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&seen);
    let mut g = grid().with_on_search(move |text| {
        record.lock().unwrap().push(text.to_string());
        Handled::Yes
    });

    g.set_search_text("Nordrail");
    assert_eq!(g.processed_indices().len(), 5);
    assert_eq!(*seen.lock().unwrap(), vec!["Nordrail".to_string()]);
}

#[test]
fn test_search_without_fields_keeps_rows() {
    let mut g = DataGrid::new(&bill_columns(), bills(), GridConfig::default()).unwrap();
    g.set_search_text("Nordrail");
    assert_eq!(g.processed_indices().len(), 5);
}

// -------------------------------------------------------------------------
// Column visibility and order
// -------------------------------------------------------------------------

#[test]
fn test_hiding_mandatory_column_warns() {
    let (mut g, events) = record_events(grid());
    let err = g.toggle_column("id").unwrap_err();
    assert!(matches!(err, GridError::MandatoryColumn(ref h) if h == "Bill No"));
    assert!(g.columns().is_visible("id"));

    let n = g.last_notification().unwrap();
    assert_eq!(n.level, Level::Warning);
    assert_eq!(n.message, "Cannot hide mandatory column: Bill No");
    assert!(view(&g).contains("Cannot hide mandatory column: Bill No"));

    let events = events.lock().unwrap();
    assert!(matches!(events.last(), Some(GridEvent::Notified(n)) if n.level == Level::Warning));
}

#[test]
fn test_three_columns_two_visible() {
    let columns = vec![
        Column::new("a", "A"),
        Column::new("b", "B"),
        Column::new("c", "C"),
    ];
    let rows = vec![Row::new().with("a", "a1").with("b", "b1").with("c", "c1")];
    let config = GridConfig::default().with_max_visible_columns(2);
    let mut g = DataGrid::new(&columns, rows, config).unwrap();

    let split = g.column_split();
    let main: Vec<&str> = split.main.iter().map(|c| c.key.as_str()).collect();
    let nested: Vec<&str> = split.nested.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(main, vec!["a", "b"]);
    assert_eq!(nested, vec!["c"]);

    let collapsed = view(&g);
    assert!(collapsed.contains(style::COLLAPSED));
    assert!(!collapsed.contains("C: c1"));

    press(&mut g, KeyCode::Char(' '));
    assert!(g.is_row_expanded(0));
    assert!(view(&g).contains("C: c1"));

    g.toggle_column("b").unwrap();
    let split = g.column_split();
    assert_eq!(split.main.len(), 2);
    assert!(!split.has_nested());
}

#[test]
fn test_column_menu_keys() {
    let (mut g, events) = record_events(grid());
    press_char(&mut g, 'c');
    assert_eq!(g.menu(), Menu::Columns { cursor: 0 });
    assert!(view(&g).contains("All columns"));

    // Entry 1 is the mandatory "id" column.
    press_char(&mut g, 'j');
    press(&mut g, KeyCode::Char(' '));
    assert!(g.columns().is_visible("id"));
    assert_eq!(g.last_notification().unwrap().level, Level::Warning);

    press_char(&mut g, 'j');
    press(&mut g, KeyCode::Char(' '));
    assert!(!g.columns().is_visible("date"));

    press_char(&mut g, 'J');
    assert_eq!(g.menu(), Menu::Columns { cursor: 3 });
    assert_eq!(g.schema().keys()[..3], ["id", "status", "date"]);

    // Toggle-all shows everything again.
    press_char(&mut g, 'k');
    press_char(&mut g, 'k');
    press_char(&mut g, 'k');
    press(&mut g, KeyCode::Enter);
    assert!(g.columns().all_visible());

    press(&mut g, KeyCode::Esc);
    assert_eq!(g.menu(), Menu::Closed);

    let events = events.lock().unwrap();
    assert!(events.contains(&GridEvent::ColumnToggled {
        key: "date".to_string(),
        visible: false,
    }));
    assert!(events.contains(&GridEvent::AllColumnsToggled(true)));
}

#[test]
fn test_drag_reorder_renumbers() {
    let (mut g, events) = record_events(grid());
    let schema = g.drag_reorder("lineNo", "id").unwrap();
    assert_eq!(schema.keys()[..2], ["lineNo", "id"]);
    let sequences: Vec<i32> = schema.iter().map(|c| c.sequence).collect();
    assert_eq!(sequences, (0..7).collect::<Vec<_>>());
    assert_eq!(g.column_split().main[0].key, "lineNo");

    assert!(g.drag_reorder("id", "id").is_none());
    assert!(g.drag_reorder("nope", "id").is_none());
    assert_eq!(
        events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, GridEvent::ColumnsReordered(_)))
            .count(),
        1
    );
}

// -------------------------------------------------------------------------
// Sorting
// -------------------------------------------------------------------------

#[test]
fn test_sort_cycle_through_keys() {
    let mut g = grid();
    press_char(&mut g, 'l');
    press_char(&mut g, 'l');
    assert_eq!(g.selected_column_key().as_deref(), Some("status"));

    press_char(&mut g, 's');
    assert_eq!(g.sort_state().direction, SortDirection::Ascending);
    assert_eq!(g.processed_indices(), vec![2, 4, 1, 3, 0]);
    assert!(view(&g).contains("Status ▲"));

    press_char(&mut g, 's');
    assert_eq!(g.sort_state().direction, SortDirection::Descending);
    assert_eq!(g.processed_indices(), vec![0, 1, 3, 2, 4]);

    press_char(&mut g, 's');
    assert_eq!(g.sort_state().direction, SortDirection::None);
    assert_eq!(g.processed_indices(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_sort_taken_over_by_caller() {
    let mut g = grid().with_on_sort_change(|_| Handled::Yes);
    g.sort_by("customerSupplier");
    assert_eq!(g.sort_state().column.as_deref(), Some("customerSupplier"));
    assert_eq!(g.processed_indices(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_unsortable_column_is_ignored() {
    let columns = vec![Column::new("id", "Id").sortable(false)];
    let mut g = DataGrid::new(&columns, Vec::new(), GridConfig::default()).unwrap();
    g.sort_by("id");
    assert_eq!(g.sort_state(), &crate::pipeline::SortState::default());

    g.sort_by("missing");
    assert_eq!(g.last_notification().unwrap().message, "Unknown column: missing");
}

// -------------------------------------------------------------------------
// Filters
// -------------------------------------------------------------------------

#[test]
fn test_column_filters_panel() {
    let (mut g, events) = record_events(grid());
    g.set_column_filter("status", "fresh");
    // Filters only apply while the panel is shown.
    assert_eq!(g.processed_indices().len(), 5);

    g.toggle_column_filters();
    assert!(g.column_filters_shown());
    assert!(g.column_filters().is_empty());

    g.set_column_filter("status", "fresh");
    assert_eq!(g.processed_indices(), vec![1, 3]);
    g.set_column_filter("customerSupplier", "orits");
    assert_eq!(g.processed_indices(), vec![1]);

    g.toggle_column_filters();
    assert_eq!(g.processed_indices().len(), 5);

    assert!(events
        .lock()
        .unwrap()
        .contains(&GridEvent::ColumnFiltersToggled(false)));
}

#[test]
fn test_column_filter_through_keys() {
    let mut g = grid();
    press_char(&mut g, 'f');
    press_char(&mut g, 'l');
    press_char(&mut g, 'l');
    press(&mut g, KeyCode::Tab);
    assert_eq!(g.input_mode(), &InputMode::ColumnFilter("status".to_string()));

    type_text(&mut g, "conf");
    press(&mut g, KeyCode::Enter);
    assert_eq!(g.input_mode(), &InputMode::Normal);
    assert_eq!(g.column_filters().get("status").map(String::as_str), Some("conf"));
    assert_eq!(g.processed_indices(), vec![2, 4]);
}

#[test]
fn test_tab_on_unfilterable_column_does_nothing() {
    let mut g = grid();
    press_char(&mut g, 'f');
    press(&mut g, KeyCode::Tab);
    assert_eq!(g.input_mode(), &InputMode::Normal);
}

fn popup_grid() -> DataGrid {
    let config = bill_config().with_filter_fields(vec![
        FilterField::select(
            "status",
            "Status",
            vec![
                FilterOption::new("Fresh", "Fresh"),
                FilterOption::new("Confirmed", "Confirmed"),
            ],
        ),
        FilterField::text("customerSupplier", "Customer"),
    ]);
    DataGrid::new(&bill_columns(), bills(), config).unwrap()
}

#[test]
fn test_filter_popup_through_keys() {
    let mut g = popup_grid();
    press_char(&mut g, 'p');
    assert!(g.filter_popup().is_open());
    assert!(view(&g).contains("Filters"));

    press(&mut g, KeyCode::Right);
    press(&mut g, KeyCode::Enter);
    assert!(!g.filter_popup().is_open());
    assert_eq!(g.popup_filters().get("status").map(String::as_str), Some("Fresh"));
    assert_eq!(g.processed_indices(), vec![1, 3]);
}

#[test]
fn test_filter_popup_taken_over_by_caller() {
    let applied = Arc::new(Mutex::new(None));
    let record = Arc::clone(&applied);
    let mut g = popup_grid().with_on_filter(move |values| {
        *record.lock().unwrap() = Some(values.clone());
        Handled::Yes
    });

    let mut values = crate::filter_popup::FilterValues::new();
    values.insert("status".to_string(), "Fresh".to_string());
    g.apply_popup_filters(values.clone());

    assert!(g.popup_filters().is_empty());
    assert_eq!(g.processed_indices().len(), 5);
    assert_eq!(*applied.lock().unwrap(), Some(values));
}

#[test]
fn test_popup_needs_fields() {
    let mut g = grid();
    press_char(&mut g, 'p');
    assert!(!g.filter_popup().is_open());
}

// -------------------------------------------------------------------------
// Pagination
// -------------------------------------------------------------------------

fn paged_grid() -> (DataGrid, Arc<Mutex<Vec<usize>>>) {
    let pages = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&pages);
    let g = DataGrid::new(
        &bill_columns(),
        bills(),
        bill_config().with_pagination(Pagination::new(2)),
    )
    .unwrap()
    .with_on_page_change(move |page| record.lock().unwrap().push(page));
    (g, pages)
}

#[test]
fn test_pages_cover_every_row_once() {
    let (mut g, pages) = paged_grid();
    let first = g.page_indices();
    assert_eq!(first, vec![0, 1, 2]);

    press_char(&mut g, ']');
    assert_eq!(g.current_page(), 2);
    let second = g.page_indices();
    assert_eq!(second, vec![3, 4]);

    let mut all: Vec<usize> = first.into_iter().chain(second).collect();
    all.sort_unstable();
    assert_eq!(all, g.processed_indices());

    // No page past the last.
    press_char(&mut g, ']');
    assert_eq!(g.current_page(), 2);
    assert_eq!(*pages.lock().unwrap(), vec![2]);
}

#[test]
fn test_filter_change_resets_page() {
    let (mut g, pages) = paged_grid();
    g.set_page(2);
    g.set_search_text("orits");
    assert_eq!(g.current_page(), 1);
    assert_eq!(*pages.lock().unwrap(), vec![2, 1]);

    // Already on page 1: no page change is reported.
    g.set_search_text("");
    assert_eq!(*pages.lock().unwrap(), vec![2, 1]);
}

#[test]
fn test_data_change_resets_page() {
    let (mut g, pages) = paged_grid();
    g.set_page(2);
    g.set_data(bills().into_iter().take(2).collect());
    assert_eq!(g.current_page(), 1);
    assert_eq!(g.page_indices(), vec![0]);
    assert_eq!(*pages.lock().unwrap(), vec![2, 1]);

    g.set_page(2);
    g.import_csv("id\nQB/10\nQB/11").unwrap();
    assert_eq!(g.current_page(), 1);
    assert_eq!(g.data().len(), 4);
    assert_eq!(g.page_indices(), vec![0, 1]);
}

#[test]
fn test_pagination_line() {
    let (mut g, _) = paged_grid();
    let v = view(&g);
    assert!(v.contains("‹ prev"));
    assert!(v.contains("[1]"));
    assert!(v.contains("next ›"));

    g.next_page();
    assert!(view(&g).contains("[2]"));
    g.prev_page();
    assert_eq!(g.current_page(), 1);
}

// -------------------------------------------------------------------------
// Editing
// -------------------------------------------------------------------------

type EditLog = Arc<Mutex<Vec<(usize, String, Value)>>>;

fn editable_grid() -> (DataGrid, EditLog) {
    let log: EditLog = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&log);
    let g = grid().with_on_row_edit(move |row, key, value| {
        record.lock().unwrap().push((row, key.to_string(), value.clone()));
        Ok(())
    });
    (g, log)
}

#[test]
fn test_edit_commit_through_keys() {
    let (mut g, log) = editable_grid();
    for _ in 0..3 {
        press_char(&mut g, 'l');
    }
    press_char(&mut g, 'e');
    assert!(g.editor().is_editing_cell(0, "customerSupplier"));

    for _ in 0.."Group".len() {
        press(&mut g, KeyCode::Backspace);
    }
    type_text(&mut g, "Rail");
    press(&mut g, KeyCode::Enter);

    assert!(!g.editor().is_editing());
    assert_eq!(
        *log.lock().unwrap(),
        vec![(0, "customerSupplier".to_string(), Value::Text("Orits Rail".to_string()))]
    );
    // The hook decides; the grid's data is untouched until applied.
    assert_eq!(g.data()[0].display("customerSupplier"), "Orits Group");

    g.apply_edit(0, "customerSupplier", Value::Text("Orits Rail".to_string()))
        .unwrap();
    assert_eq!(g.data()[0].display("customerSupplier"), "Orits Rail");
}

#[test]
fn test_edit_parses_column_kind() {
    let (mut g, log) = editable_grid();
    g.begin_edit(2, "totalNetAmount").unwrap();
    for _ in 0..5 {
        press(&mut g, KeyCode::Backspace);
    }
    type_text(&mut g, "99.5");
    g.commit_edit().unwrap();
    assert_eq!(log.lock().unwrap()[0].2, Value::Number(99.5));
}

#[test]
fn test_edit_cancel() {
    let (g, log) = editable_grid();
    let (mut g, events) = record_events(g);
    press_char(&mut g, 'e');
    type_text(&mut g, "xyz");
    press(&mut g, KeyCode::Esc);

    assert!(!g.editor().is_editing());
    assert!(log.lock().unwrap().is_empty());
    assert!(events.lock().unwrap().contains(&GridEvent::EditCancelled));
}

#[test]
fn test_second_edit_cancels_first() {
    let (g, _) = editable_grid();
    let (mut g, events) = record_events(g);
    g.begin_edit(0, "id").unwrap();
    g.begin_edit(1, "id").unwrap();
    assert!(g.editor().is_editing_cell(1, "id"));
    assert!(!g.editor().is_editing_cell(0, "id"));
    assert!(events.lock().unwrap().contains(&GridEvent::EditCancelled));
}

#[test]
fn test_edit_rejections() {
    let mut g = grid();
    assert!(matches!(g.begin_edit(0, "id"), Err(GridError::NoEditHandler)));
    assert_eq!(g.last_notification().unwrap().level, Level::Warning);

    let columns = vec![
        Column::new("id", "Id").editable(false),
        Column::new("total", "Total").with_cell(|v, _| format!("€ {}", v)),
    ];
    let rows = vec![Row::new().with("id", "1").with("total", 5.0)];
    let mut g = DataGrid::new(&columns, rows, GridConfig::default())
        .unwrap()
        .with_on_row_edit(|_, _, _| Ok(()));
    assert!(matches!(g.begin_edit(0, "id"), Err(GridError::NotEditable(h)) if h == "Id"));
    assert!(matches!(g.begin_edit(0, "total"), Err(GridError::NotEditable(_))));
    assert!(matches!(g.begin_edit(7, "total"), Err(GridError::NotEditable(_))));
    assert!(view(&g).contains("€ 5"));
}

#[test]
fn test_default_editable_off() {
    let columns = vec![
        Column::new("id", "Id"),
        Column::new("note", "Note").editable(true),
    ];
    let rows = vec![Row::new().with("id", "1").with("note", "x")];
    let config = GridConfig::default().with_default_editable(false);
    let mut g = DataGrid::new(&columns, rows, config)
        .unwrap()
        .with_on_row_edit(|_, _, _| Ok(()));
    assert!(matches!(g.begin_edit(0, "id"), Err(GridError::NotEditable(_))));
    assert!(g.begin_edit(0, "note").is_ok());
}

#[test]
fn test_edit_row_out_of_range() {
    let (mut g, _) = editable_grid();
    assert!(matches!(g.begin_edit(9, "id"), Err(GridError::RowOutOfRange(9))));
    assert!(!g.editor().is_editing());
}

#[test]
fn test_edit_hook_failure() {
    let mut g = grid().with_on_row_edit(|_, _, _| Err("row is locked".to_string()));
    g.begin_edit(0, "id").unwrap();
    let err = g.commit_edit().unwrap_err();
    assert_eq!(err.to_string(), "Failed to update cell: row is locked");

    let n = g.last_notification().unwrap();
    assert_eq!(n.level, Level::Error);
    assert_eq!(n.message, "Failed to update cell: row is locked");
    assert!(!g.editor().is_editing());
}

// -------------------------------------------------------------------------
// Export and import
// -------------------------------------------------------------------------

#[test]
fn test_export_csv_to_sink() {
    let sink = MemorySink::new();
    let (g, events) = record_events(grid().with_file_sink(sink.clone()));
    let mut g = g;
    press_char(&mut g, 'x');

    let files = sink.files();
    assert_eq!(files.len(), 1);
    let file = &files[0];
    assert!(file.name.starts_with("bills_"));
    assert!(file.name.ends_with(".csv"));
    assert_eq!(file.mime, CSV_MIME);

    let lines: Vec<&str> = file.contents.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[0],
        "Bill No,Bill Date,Status,Customer/Supplier,Customer Ref,Total Net Amount,Line No"
    );
    assert_eq!(
        lines[1],
        "QB/00001/2023,2023-03-12,Under Amendment,Orits Group,CSR/11/2024,1395,401"
    );
    assert!(lines[4].contains("\"Cargo Link, \"\"North\"\"\""));

    let n = g.last_notification().unwrap();
    assert_eq!(n.level, Level::Success);
    assert_eq!(n.message, "CSV exported successfully");
    assert!(events
        .lock()
        .unwrap()
        .iter()
        .any(|e| matches!(e, GridEvent::Exported { rows: 5, .. })));
}

#[test]
fn test_export_skips_hidden_columns() {
    let sink = MemorySink::new();
    let mut g = grid().with_file_sink(sink.clone());
    g.toggle_column("lineNo").unwrap();
    g.export(ExportFormat::Csv).unwrap();
    let contents = &sink.files()[0].contents;
    assert!(!contents.lines().next().unwrap().contains("Line No"));
}

#[test]
fn test_export_failures() {
    let mut g = grid();
    assert!(matches!(g.export(ExportFormat::Csv), Err(GridError::NoFileSink)));
    assert_eq!(g.last_notification().unwrap().level, Level::Error);

    assert!(matches!(
        g.export(ExportFormat::Excel),
        Err(GridError::UnsupportedExportFormat(ExportFormat::Excel))
    ));
    assert_eq!(
        g.last_notification().unwrap().message,
        "Export format not supported: Excel"
    );

    let sink = MemorySink::new();
    let mut empty = DataGrid::new(&bill_columns(), Vec::new(), GridConfig::default())
        .unwrap()
        .with_file_sink(sink.clone());
    assert!(matches!(empty.export(ExportFormat::Csv), Err(GridError::NoDataToExport)));
    assert!(sink.files().is_empty());
}

#[test]
fn test_export_taken_over_by_caller() {
    let sink = MemorySink::new();
    let mut g = grid()
        .with_file_sink(sink.clone())
        .with_on_export(|format| {
            if format == ExportFormat::Pdf {
                Handled::Yes
            } else {
                Handled::No
            }
        });
    assert!(g.export(ExportFormat::Pdf).is_ok());
    assert!(sink.files().is_empty());
    assert!(g.last_notification().is_none());
}

#[test]
fn test_export_then_import_round_trip() {
    let sink = MemorySink::new();
    let mut source = grid().with_file_sink(sink.clone());
    source.export(ExportFormat::Csv).unwrap();
    let csv = sink.files()[0].contents.clone();

    let mut target = DataGrid::new(&bill_columns(), Vec::new(), bill_config()).unwrap();
    assert_eq!(target.import_csv(&csv).unwrap(), 5);
    assert_eq!(target.data(), source.data());
}

#[test]
fn test_import_file_message() {
    let mut g = grid();
    g.blur();
    // File results arrive even while the grid is not focused.
    g.update(Box::new(ImportFileMsg {
        name: "more.csv".to_string(),
        result: Ok("Bill No,status,Unknown\nQB/9,Fresh,x\n\n".to_string()),
    }));

    assert_eq!(g.data().len(), 6);
    let row = &g.data()[5];
    assert_eq!(row.display("id"), "QB/9");
    assert_eq!(row.get("status"), Some(&Value::Enum("Fresh".to_string())));
    assert!(!row.contains_key("customerSupplier"));

    let n = g.last_notification().unwrap();
    assert_eq!(n.level, Level::Success);
    assert_eq!(n.message, "Imported 1 rows");
}

#[test]
fn test_import_errors() {
    let mut g = grid();
    g.update(Box::new(ImportFileMsg {
        name: "bills.txt".to_string(),
        result: Err(GridError::UnsupportedFileType("bills.txt".to_string())),
    }));
    assert_eq!(
        g.last_notification().unwrap().message,
        "Please select a CSV file (got 'bills.txt')"
    );

    assert!(matches!(g.import_csv(""), Err(GridError::EmptyFile)));
    assert!(matches!(g.import_csv("foo,bar\n1,2"), Err(GridError::NoMatchingColumns)));
    assert!(matches!(g.import_csv("Bill No\n"), Err(GridError::NoDataRows)));
    assert!(matches!(
        g.import_csv("Bill No\nQB/10\n\"QB/11\nQB/12"),
        Err(GridError::UnterminatedQuote(3))
    ));
    let n = g.last_notification().unwrap();
    assert_eq!(n.level, Level::Error);
    assert_eq!(n.message, "Unterminated quoted field starting on line 3");
    assert_eq!(g.data().len(), 5);
}

#[test]
fn test_import_hook_receives_rows() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&received);
    let mut g = grid().with_on_import(move |rows| {
        record.lock().unwrap().extend(rows);
        Ok(())
    });
    g.import_csv("id\nQB/10\nQB/11").unwrap();
    assert_eq!(received.lock().unwrap().len(), 2);
    assert_eq!(g.data().len(), 5);

    let mut failing = grid().with_on_import(|_| Err("read only".to_string()));
    assert!(matches!(failing.import_csv("id\nQB/10"), Err(GridError::Callback(_))));
    assert_eq!(failing.last_notification().unwrap().message, "read only");
}

#[test]
fn test_data_menu() {
    let mut g = grid();
    assert_eq!(g.data_actions().len(), 3);

    let mut g2 = DataGrid::new(
        &bill_columns(),
        bills(),
        bill_config().with_import_path("incoming/bills.csv"),
    )
    .unwrap();
    assert_eq!(g2.data_actions().last(), Some(&DataAction::Import));

    press_char(&mut g2, 'm');
    assert!(view(&g2).contains("Import CSV (bills.csv)"));
    for _ in 0..3 {
        press_char(&mut g2, 'j');
    }
    assert_eq!(g2.menu(), Menu::Data { cursor: 3 });
    assert!(press(&mut g2, KeyCode::Enter).is_some());
    assert_eq!(g2.menu(), Menu::Closed);

    // Excel export without a hook.
    press_char(&mut g, 'm');
    press_char(&mut g, 'j');
    assert!(press(&mut g, KeyCode::Enter).is_none());
    assert_eq!(
        g.last_notification().unwrap().message,
        "Export format not supported: Excel"
    );
}

// -------------------------------------------------------------------------
// View, focus and events
// -------------------------------------------------------------------------

#[test]
fn test_view_contents() {
    let g = grid();
    let v = view(&g);
    assert!(v.contains("Bills"));
    assert!(v.contains(" 5 "));
    assert!(v.contains("/ Search"));
    assert!(v.contains("Bill No ✓"));
    assert!(v.contains("⇅"));
    assert!(v.contains("QB/00001/2023"));
    // Seven columns with five in the row: the rest are nested.
    assert!(v.contains(style::COLLAPSED));
    assert!(!v.contains("Line No:"));
}

#[test]
fn test_view_no_data() {
    let mut g = grid();
    g.set_search_text("no such bill");
    let v = view(&g);
    assert!(v.contains("No data found"));
    assert!(v.contains(" 0 "));
}

#[test]
fn test_count_badge_override() {
    let config = bill_config().with_count(120);
    let g = DataGrid::new(&bill_columns(), bills(), config).unwrap();
    assert!(view(&g).contains(" 120 "));
}

#[test]
fn test_expanded_row_shows_nested_columns() {
    let mut g = grid();
    g.toggle_row_expanded(0);
    let v = view(&g);
    assert!(v.contains(style::EXPANDED));
    assert!(v.contains("Total Net Amount: 1395"));
    assert!(v.contains("Line No: 401"));

    assert!(!g.toggle_row_expanded(0));
    assert!(!g.toggle_row_expanded(42));
    assert_eq!(g.last_notification().unwrap().message, "Row 42 does not exist");
}

#[test]
fn test_toolbar_hidden() {
    let config = bill_config().with_toolbar(false);
    let g = DataGrid::new(&bill_columns(), bills(), config).unwrap();
    assert!(!view(&g).contains("Bills"));
}

#[test]
fn test_cursor_stays_in_bounds() {
    let mut g = grid();
    for _ in 0..10 {
        press_char(&mut g, 'j');
        press_char(&mut g, 'l');
    }
    assert_eq!(g.cursor(), (4, 4));
    assert_eq!(g.selected_row_index(), Some(4));

    g.set_search_text("orits");
    assert_eq!(g.cursor().0, 2);
}

#[test]
fn test_blur_ignores_keys() {
    let mut g = grid();
    g.blur();
    assert!(!g.focused());
    press_char(&mut g, 'j');
    assert_eq!(g.cursor(), (0, 0));

    g.focus();
    press_char(&mut g, 'j');
    assert_eq!(g.cursor(), (1, 0));
}

#[test]
fn test_blur_cancels_edit() {
    let (mut g, _) = editable_grid();
    g.begin_edit(0, "id").unwrap();
    g.blur();
    assert!(!g.editor().is_editing());
}

#[test]
fn test_event_hook_sees_changes() {
    let (mut g, events) = record_events(grid());
    g.sort_by("id");
    g.toggle_row_expanded(1);
    g.set_column_filter("status", "Fresh");

    let events = events.lock().unwrap();
    assert_eq!(
        events[0],
        GridEvent::SortChanged(crate::pipeline::SortState {
            column: Some("id".to_string()),
            direction: SortDirection::Ascending,
        })
    );
    assert_eq!(
        events[1],
        GridEvent::RowExpanded {
            row: 1,
            expanded: true
        }
    );
    assert_eq!(
        events[2],
        GridEvent::ColumnFilterChanged {
            key: "status".to_string(),
            value: "Fresh".to_string(),
        }
    );
}

#[test]
fn test_notification_history_is_bounded() {
    let mut g = grid();
    for _ in 0..40 {
        let _ = g.toggle_column("id");
    }
    assert!(g.notifications().len() <= 16);
    g.clear_notifications();
    assert!(g.last_notification().is_none());
}
