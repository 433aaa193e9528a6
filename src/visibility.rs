//! Column visibility and ordering.
//!
//! [`ColumnController`] owns its own copy of the prepared columns, kept in
//! sequence order, plus the set of visible keys. Every reorder produces a new
//! immutable [`ColumnSchema`] snapshot; callers never see the controller's
//! columns change underneath them.
//!
//! After every operation the mandatory columns are visible and at least one
//! column is visible.

use crate::column::{sort_by_sequence, PreparedColumn};
use crate::error::GridError;
use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

/// Direction of a single-step reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards the start (left).
    Up,
    /// Towards the end (right).
    Down,
}

/// An immutable, cheaply cloned snapshot of the column order.
#[derive(Debug, Clone)]
pub struct ColumnSchema(Arc<[PreparedColumn]>);

impl ColumnSchema {
    fn new(columns: &[PreparedColumn]) -> Self {
        Self(Arc::from(columns.to_vec()))
    }

    /// Column keys in order.
    pub fn keys(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.key.as_str()).collect()
    }
}

impl Deref for ColumnSchema {
    type Target = [PreparedColumn];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Tracks which columns are shown and in what order.
///
/// # Examples
///
/// ```rust
/// use bubbletea_datagrid::column::{prepare_columns, Column};
/// use bubbletea_datagrid::visibility::ColumnController;
///
/// let prepared = prepare_columns(
///     &[Column::new("id", "Id"), Column::new("status", "Status")],
///     &[],
///     true,
/// ).unwrap();
/// let mut columns = ColumnController::new(prepared);
///
/// // "id" is mandatory by default, so it cannot be hidden.
/// assert!(columns.toggle_column("id").is_err());
/// assert_eq!(columns.toggle_column("status").unwrap(), false);
/// assert!(!columns.is_visible("status"));
/// ```
#[derive(Debug, Clone)]
pub struct ColumnController {
    columns: Vec<PreparedColumn>,
    visible: BTreeSet<String>,
    schema: ColumnSchema,
}

impl ColumnController {
    /// Creates a controller with every column visible.
    pub fn new(prepared: Vec<PreparedColumn>) -> Self {
        let columns = sort_by_sequence(prepared);
        let visible = columns.iter().map(|c| c.key.clone()).collect();
        let schema = ColumnSchema::new(&columns);
        Self {
            columns,
            visible,
            schema,
        }
    }

    /// The current column order snapshot.
    pub fn schema(&self) -> ColumnSchema {
        self.schema.clone()
    }

    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Option<&PreparedColumn> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// True if the column is currently shown.
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.contains(key)
    }

    /// The set of visible keys.
    pub fn visible_keys(&self) -> &BTreeSet<String> {
        &self.visible
    }

    /// True when every column is shown.
    pub fn all_visible(&self) -> bool {
        self.visible.len() == self.columns.len()
    }

    /// Visible columns in sequence order.
    pub fn ordered_visible(&self) -> Vec<PreparedColumn> {
        self.columns
            .iter()
            .filter(|c| self.visible.contains(&c.key))
            .cloned()
            .collect()
    }

    /// Keys of mandatory columns in sequence order.
    pub fn mandatory_keys(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.mandatory)
            .map(|c| c.key.clone())
            .collect()
    }

    /// Shows or hides a column and returns its new visibility.
    ///
    /// # Errors
    ///
    /// Rejects, leaving state unchanged, unknown keys, mandatory columns, and
    /// hiding the last visible column.
    pub fn toggle_column(&mut self, key: &str) -> Result<bool, GridError> {
        let column = self
            .column(key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))?;

        if column.mandatory {
            return Err(GridError::MandatoryColumn(column.header.clone()));
        }

        if self.visible.contains(key) {
            if self.visible.len() <= 1 {
                return Err(GridError::LastVisibleColumn);
            }
            self.visible.remove(key);
            tracing::debug!(column = key, "column hidden");
            Ok(false)
        } else {
            self.visible.insert(key.to_string());
            tracing::debug!(column = key, "column shown");
            Ok(true)
        }
    }

    /// Shows every column, or reduces to the mandatory columns.
    ///
    /// With no mandatory columns, hiding all keeps the first column in
    /// sequence order so the set is never empty.
    pub fn toggle_all_columns(&mut self, show_all: bool) {
        if show_all {
            self.visible = self.columns.iter().map(|c| c.key.clone()).collect();
        } else {
            let mandatory = self.mandatory_keys();
            self.visible = if mandatory.is_empty() {
                self.columns.iter().take(1).map(|c| c.key.clone()).collect()
            } else {
                mandatory.into_iter().collect()
            };
        }
        tracing::debug!(show_all, visible = self.visible.len(), "toggled all columns");
    }

    /// Swaps a column with its neighbour in sequence order.
    ///
    /// Returns the new snapshot, or `None` at either boundary or for an
    /// unknown key.
    pub fn reorder_column(&mut self, key: &str, direction: MoveDirection) -> Option<ColumnSchema> {
        let index = self.columns.iter().position(|c| c.key == key)?;
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1)?,
            MoveDirection::Down if index + 1 < self.columns.len() => index + 1,
            MoveDirection::Down => return None,
        };

        let current_seq = self.columns[index].sequence;
        self.columns[index].sequence = self.columns[target].sequence;
        self.columns[target].sequence = current_seq;
        self.columns.swap(index, target);

        tracing::debug!(column = key, ?direction, "column moved");
        self.schema = ColumnSchema::new(&self.columns);
        Some(self.schema())
    }

    /// Moves `source` to the position held by `target`, then renumbers every
    /// sequence to `0..n`.
    ///
    /// Returns `None` when the keys are equal or either key is unknown.
    pub fn drag_reorder(&mut self, source: &str, target: &str) -> Option<ColumnSchema> {
        if source == target {
            return None;
        }
        let source_index = self.columns.iter().position(|c| c.key == source)?;
        let target_index = self.columns.iter().position(|c| c.key == target)?;

        let moved = self.columns.remove(source_index);
        self.columns.insert(target_index, moved);
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.sequence = index as i32;
        }

        tracing::debug!(source, target, "column dragged");
        self.schema = ColumnSchema::new(&self.columns);
        Some(self.schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{prepare_columns, Column};

    fn controller(mandatory: &[&str]) -> ColumnController {
        let keys: Vec<String> = mandatory.iter().map(|s| s.to_string()).collect();
        let prepared = prepare_columns(
            &[
                Column::new("id", "Id"),
                Column::new("status", "Status"),
                Column::new("amount", "Amount"),
                Column::new("date", "Date"),
            ],
            &keys,
            true,
        )
        .unwrap();
        ColumnController::new(prepared)
    }

    fn invariants_hold(c: &ColumnController) -> bool {
        !c.visible_keys().is_empty() && c.mandatory_keys().iter().all(|k| c.is_visible(k))
    }

    #[test]
    fn test_toggle_rejects_mandatory() {
        let mut c = controller(&[]);
        let before = c.visible_keys().clone();
        let err = c.toggle_column("id").unwrap_err();
        assert!(matches!(err, GridError::MandatoryColumn(h) if h == "Id"));
        assert_eq!(c.visible_keys(), &before);
    }

    #[test]
    fn test_toggle_rejects_last_visible() {
        let prepared = prepare_columns(
            &[
                Column::new("a", "A").mandatory(false),
                Column::new("b", "B").mandatory(false),
            ],
            &[],
            true,
        )
        .unwrap();
        let mut c = ColumnController::new(prepared);
        assert_eq!(c.toggle_column("a").unwrap(), false);
        assert!(matches!(c.toggle_column("b"), Err(GridError::LastVisibleColumn)));
        assert!(c.is_visible("b"));
    }

    #[test]
    fn test_toggle_unknown_column() {
        let mut c = controller(&[]);
        assert!(matches!(c.toggle_column("nope"), Err(GridError::UnknownColumn(_))));
    }

    #[test]
    fn test_toggle_all() {
        let mut c = controller(&["status"]);
        c.toggle_all_columns(false);
        assert_eq!(c.visible_keys().iter().collect::<Vec<_>>(), vec!["status"]);
        c.toggle_all_columns(true);
        assert!(c.all_visible());
    }

    #[test]
    fn test_toggle_all_without_mandatory_keeps_first() {
        let prepared = prepare_columns(
            &[Column::new("a", "A").mandatory(false), Column::new("b", "B")],
            &["x".to_string()],
            true,
        )
        .unwrap();
        let mut c = ColumnController::new(prepared);
        c.toggle_all_columns(false);
        assert_eq!(c.visible_keys().iter().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_invariants_over_all_toggle_sequences() {
        let ops: Vec<Box<dyn Fn(&mut ColumnController)>> = vec![
            Box::new(|c: &mut ColumnController| {
                let _ = c.toggle_column("id");
            }),
            Box::new(|c: &mut ColumnController| {
                let _ = c.toggle_column("status");
            }),
            Box::new(|c: &mut ColumnController| {
                let _ = c.toggle_column("amount");
            }),
            Box::new(|c: &mut ColumnController| {
                let _ = c.toggle_column("date");
            }),
            Box::new(|c: &mut ColumnController| c.toggle_all_columns(true)),
            Box::new(|c: &mut ColumnController| c.toggle_all_columns(false)),
        ];

        // Every sequence of four operations.
        let n = ops.len();
        for seq in 0..n.pow(4) {
            for mandatory in [&[][..], &["amount"][..]] {
                let mut c = controller(mandatory);
                let mut code = seq;
                for _ in 0..4 {
                    ops[code % n](&mut c);
                    code /= n;
                    assert!(invariants_hold(&c));
                }
            }
        }
    }

    #[test]
    fn test_reorder_up_and_down() {
        let mut c = controller(&[]);
        let schema = c.reorder_column("status", MoveDirection::Up).unwrap();
        assert_eq!(schema.keys(), vec!["status", "id", "amount", "date"]);
        assert_eq!(schema[0].sequence, 0);
        assert_eq!(schema[1].sequence, 1);

        assert!(c.reorder_column("status", MoveDirection::Up).is_none());
        assert!(c.reorder_column("date", MoveDirection::Down).is_none());

        let schema = c.reorder_column("id", MoveDirection::Down).unwrap();
        assert_eq!(schema.keys(), vec!["status", "amount", "id", "date"]);
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let mut c = controller(&[]);
        let before = c.schema();
        c.drag_reorder("date", "id").unwrap();
        assert_eq!(before.keys(), vec!["id", "status", "amount", "date"]);
        assert_eq!(c.schema().keys(), vec!["date", "id", "status", "amount"]);
    }

    #[test]
    fn test_drag_reorder_renumbers_densely() {
        let prepared = prepare_columns(
            &[
                Column::new("a", "A").with_sequence(10),
                Column::new("b", "B").with_sequence(20),
                Column::new("c", "C").with_sequence(30),
                Column::new("d", "D").with_sequence(40),
            ],
            &[],
            true,
        )
        .unwrap();

        for (source, target, expected) in [
            ("a", "c", vec!["b", "c", "a", "d"]),
            ("d", "a", vec!["d", "a", "b", "c"]),
            ("b", "d", vec!["a", "c", "d", "b"]),
        ] {
            let mut c = ColumnController::new(prepared.clone());
            let schema = c.drag_reorder(source, target).unwrap();
            assert_eq!(schema.keys(), expected);
            let seqs: Vec<i32> = schema.iter().map(|col| col.sequence).collect();
            assert_eq!(seqs, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_drag_reorder_noops() {
        let mut c = controller(&[]);
        assert!(c.drag_reorder("id", "id").is_none());
        assert!(c.drag_reorder("id", "missing").is_none());
        assert!(c.drag_reorder("missing", "id").is_none());
        assert_eq!(c.schema().keys(), vec!["id", "status", "amount", "date"]);
    }
}
