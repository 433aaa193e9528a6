//! Search, filter, sort and paginate.
//!
//! Every stage is a pure function from row indices to row indices, so the
//! caller's data is never reordered and a row keeps its position as identity
//! no matter how the view is arranged.

use crate::value::Row;
use std::collections::BTreeMap;
use std::ops::Range;

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// A to Z.
    Ascending,
    /// Z to A.
    Descending,
    /// Original order.
    #[default]
    None,
}

/// The column being sorted and how.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    /// Key of the sorted column.
    pub column: Option<String>,
    /// Current direction.
    pub direction: SortDirection,
}

impl SortState {
    /// The state after the header of `column` is activated.
    ///
    /// The same column cycles ascending, descending, none; a different column
    /// starts ascending.
    ///
    /// ```rust
    /// use bubbletea_datagrid::pipeline::{SortDirection, SortState};
    ///
    /// let s = SortState::default().next("amount");
    /// assert_eq!(s.direction, SortDirection::Ascending);
    /// let s = s.next("amount");
    /// assert_eq!(s.direction, SortDirection::Descending);
    /// let s = s.next("date");
    /// assert_eq!(s.direction, SortDirection::Ascending);
    /// ```
    pub fn next(&self, column: &str) -> SortState {
        let direction = if self.column.as_deref() == Some(column) {
            match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::None,
                SortDirection::None => SortDirection::Ascending,
            }
        } else {
            SortDirection::Ascending
        };
        SortState {
            column: Some(column.to_string()),
            direction,
        }
    }

    /// The direction for `column`, or `None` if another column is sorted.
    pub fn direction_for(&self, column: &str) -> SortDirection {
        if self.column.as_deref() == Some(column) {
            self.direction
        } else {
            SortDirection::None
        }
    }
}

/// Keeps rows where any of `fields` contains `text`, ignoring case.
///
/// Empty text keeps every row.
pub fn search_rows(rows: &[Row], indices: Vec<usize>, text: &str, fields: &[String]) -> Vec<usize> {
    let needle = text.to_lowercase();
    if needle.is_empty() {
        return indices;
    }
    indices
        .into_iter()
        .filter(|&i| {
            rows.get(i).is_some_and(|row| {
                fields
                    .iter()
                    .any(|f| row.display(f).to_lowercase().contains(&needle))
            })
        })
        .collect()
}

/// Keeps rows that satisfy every non-empty filter.
///
/// A filter on `key` matches when the row's display value for `key` contains
/// the filter text, ignoring case. Absent cells read as "".
pub fn filter_rows(
    rows: &[Row],
    indices: Vec<usize>,
    filters: &BTreeMap<String, String>,
) -> Vec<usize> {
    let active: Vec<(&String, String)> = filters
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k, v.to_lowercase()))
        .collect();
    if active.is_empty() {
        return indices;
    }
    indices
        .into_iter()
        .filter(|&i| {
            rows.get(i).is_some_and(|row| {
                active
                    .iter()
                    .all(|(key, needle)| row.display(key).to_lowercase().contains(needle.as_str()))
            })
        })
        .collect()
}

/// Orders indices by the sorted column's display string.
///
/// The sort is stable; [`SortDirection::None`] or no column leaves the order
/// untouched.
pub fn sort_rows(rows: &[Row], indices: Vec<usize>, sort: &SortState) -> Vec<usize> {
    let Some(column) = sort.column.as_deref() else {
        return indices;
    };
    if sort.direction == SortDirection::None {
        return indices;
    }

    let mut keyed: Vec<(String, usize)> = indices
        .into_iter()
        .map(|i| (rows.get(i).map(|r| r.display(column)).unwrap_or_default(), i))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match sort.direction {
        SortDirection::Descending => b.cmp(a),
        _ => a.cmp(b),
    });
    keyed.into_iter().map(|(_, i)| i).collect()
}

/// Rows per page when `count` rows are spread over `total_pages` pages.
pub fn page_size(count: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        return count;
    }
    count.div_ceil(total_pages)
}

/// The slice of the processed rows shown on `current_page` (1-based).
///
/// Pages past the end give an empty range.
///
/// ```rust
/// use bubbletea_datagrid::pipeline::page_bounds;
///
/// assert_eq!(page_bounds(10, 1, 3), 0..4);
/// assert_eq!(page_bounds(10, 3, 3), 8..10);
/// ```
pub fn page_bounds(count: usize, current_page: usize, total_pages: usize) -> Range<usize> {
    let size = page_size(count, total_pages);
    let page = current_page.max(1);
    let start = ((page - 1) * size).min(count);
    let end = (page * size).min(count);
    start..end
}
