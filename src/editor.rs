//! Inline cell editing.
//!
//! [`CellEditor`] is a small state machine: it is either viewing or editing
//! exactly one cell. Enter commits the buffer, Escape cancels, and other keys
//! edit a grapheme-aware [`TextBuffer`]. Committing only hands the text back
//! to the grid; the row-edit callback decides whether the change is applied.

use crate::key::{new_binding, with_help, with_keys_str, Binding, KeyMap};
use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

/// A single-line text buffer with a caret measured in graphemes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    graphemes: Vec<String>,
    caret: usize,
}

impl TextBuffer {
    /// Creates a buffer holding `text` with the caret at the end.
    pub fn new(text: &str) -> Self {
        let graphemes: Vec<String> = text.graphemes(true).map(str::to_string).collect();
        let caret = graphemes.len();
        Self { graphemes, caret }
    }

    /// The buffer contents.
    pub fn value(&self) -> String {
        self.graphemes.concat()
    }

    /// Caret position in graphemes.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Number of graphemes.
    pub fn len(&self) -> usize {
        self.graphemes.len()
    }

    /// True when the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.graphemes.is_empty()
    }

    /// Replaces the contents and moves the caret to the end.
    pub fn set_value(&mut self, text: &str) {
        *self = Self::new(text);
    }

    /// Inserts text at the caret.
    pub fn insert_str(&mut self, text: &str) {
        for g in text.graphemes(true) {
            self.graphemes.insert(self.caret, g.to_string());
            self.caret += 1;
        }
    }

    /// Deletes the grapheme before the caret.
    pub fn backspace(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        self.graphemes.remove(self.caret);
        true
    }

    /// Deletes the grapheme under the caret.
    pub fn delete(&mut self) -> bool {
        if self.caret >= self.graphemes.len() {
            return false;
        }
        self.graphemes.remove(self.caret);
        true
    }

    /// Moves the caret one grapheme left.
    pub fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    /// Moves the caret one grapheme right.
    pub fn move_right(&mut self) {
        self.caret = (self.caret + 1).min(self.graphemes.len());
    }

    /// Moves the caret to the start.
    pub fn home(&mut self) {
        self.caret = 0;
    }

    /// Moves the caret to the end.
    pub fn end(&mut self) {
        self.caret = self.graphemes.len();
    }

    /// Splits the contents around the caret: before, under, after.
    pub fn split_at_caret(&self) -> (String, Option<&str>, String) {
        let before = self.graphemes[..self.caret].concat();
        let under = self.graphemes.get(self.caret).map(String::as_str);
        let after = if self.caret < self.graphemes.len() {
            self.graphemes[self.caret + 1..].concat()
        } else {
            String::new()
        };
        (before, under, after)
    }

    /// Applies a text-editing key. Returns true if the key was consumed.
    pub fn handle_key(&mut self, keymap: &EditorKeyMap, msg: &KeyMsg) -> bool {
        if keymap.delete_backward.matches(msg) {
            self.backspace();
        } else if keymap.delete_forward.matches(msg) {
            self.delete();
        } else if keymap.caret_left.matches(msg) {
            self.move_left();
        } else if keymap.caret_right.matches(msg) {
            self.move_right();
        } else if keymap.line_start.matches(msg) {
            self.home();
        } else if keymap.line_end.matches(msg) {
            self.end();
        } else if let Some(c) = printable(msg) {
            self.insert_str(c.encode_utf8(&mut [0; 4]));
        } else {
            return false;
        }
        true
    }
}

/// The character typed by a key, if it is plain text input.
pub(crate) fn printable(msg: &KeyMsg) -> Option<char> {
    match msg.key {
        KeyCode::Char(c)
            if !msg.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                && !c.is_control() =>
        {
            Some(c)
        }
        _ => None,
    }
}

/// Key bindings used while a cell is being edited.
#[derive(Debug, Clone)]
pub struct EditorKeyMap {
    /// Save the edit.
    pub commit: Binding,
    /// Discard the edit.
    pub cancel: Binding,
    /// Move the caret left.
    pub caret_left: Binding,
    /// Move the caret right.
    pub caret_right: Binding,
    /// Move to the start of the text.
    pub line_start: Binding,
    /// Move to the end of the text.
    pub line_end: Binding,
    /// Delete before the caret.
    pub delete_backward: Binding,
    /// Delete under the caret.
    pub delete_forward: Binding,
}

impl Default for EditorKeyMap {
    fn default() -> Self {
        Self {
            commit: new_binding(vec![with_keys_str(&["enter"]), with_help("enter", "save")]),
            cancel: new_binding(vec![with_keys_str(&["esc"]), with_help("esc", "cancel")]),
            caret_left: new_binding(vec![with_keys_str(&["left", "ctrl+b"])]),
            caret_right: new_binding(vec![with_keys_str(&["right", "ctrl+f"])]),
            line_start: new_binding(vec![with_keys_str(&["home", "ctrl+a"])]),
            line_end: new_binding(vec![with_keys_str(&["end", "ctrl+e"])]),
            delete_backward: new_binding(vec![with_keys_str(&["backspace", "ctrl+h"])]),
            delete_forward: new_binding(vec![with_keys_str(&["delete", "ctrl+d"])]),
        }
    }
}

impl KeyMap for EditorKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.commit, &self.cancel]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.commit, &self.cancel],
            vec![&self.caret_left, &self.caret_right, &self.line_start, &self.line_end],
        ]
    }
}

/// Which cell, if any, is being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    /// No cell is being edited.
    #[default]
    Viewing,
    /// One cell is being edited.
    Editing {
        /// Index of the row in the grid's data.
        row: usize,
        /// Column key.
        key: String,
    },
}

/// A finished edit, ready for the row-edit callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCommit {
    /// Index of the row in the grid's data.
    pub row: usize,
    /// Column key.
    pub key: String,
    /// Raw text typed by the user.
    pub text: String,
}

/// The result of feeding a key to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Not editing; the key was not used.
    Ignored,
    /// The buffer changed or the caret moved.
    Continue,
    /// Enter was pressed.
    Commit(EditCommit),
    /// Escape was pressed.
    Cancelled,
}

/// The inline cell editor.
///
/// # Examples
///
/// ```rust
/// use bubbletea_datagrid::editor::{CellEditor, EditOutcome};
/// use bubbletea_rs::KeyMsg;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let mut editor = CellEditor::new();
/// editor.begin(0, "amount", "10");
///
/// let key = |code| KeyMsg { key: code, modifiers: KeyModifiers::NONE };
/// editor.handle_key(&key(KeyCode::Char('5')));
/// match editor.handle_key(&key(KeyCode::Enter)) {
///     EditOutcome::Commit(commit) => assert_eq!(commit.text, "105"),
///     other => panic!("unexpected {:?}", other),
/// }
/// assert!(!editor.is_editing());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CellEditor {
    state: EditState,
    buffer: TextBuffer,
    /// Key bindings.
    pub keymap: EditorKeyMap,
}

impl CellEditor {
    /// Creates an idle editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// True while a cell is being edited.
    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// True while this cell is being edited.
    pub fn is_editing_cell(&self, row: usize, key: &str) -> bool {
        matches!(&self.state, EditState::Editing { row: r, key: k } if *r == row && k == key)
    }

    /// The text being edited.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Starts editing a cell with `initial` text.
    ///
    /// Any edit already in progress is discarded and returned.
    pub fn begin(&mut self, row: usize, key: &str, initial: &str) -> Option<EditState> {
        let previous = self.is_editing().then(|| self.state.clone());
        if let Some(EditState::Editing { row, key }) = &previous {
            tracing::debug!(row, column = key.as_str(), "previous edit discarded");
        }
        self.state = EditState::Editing {
            row,
            key: key.to_string(),
        };
        self.buffer = TextBuffer::new(initial);
        tracing::debug!(row, column = key, "editing cell");
        previous
    }

    /// Discards the edit in progress.
    pub fn cancel(&mut self) {
        if self.is_editing() {
            tracing::debug!("edit cancelled");
        }
        self.state = EditState::Viewing;
        self.buffer = TextBuffer::default();
    }

    /// Ends the edit and returns it for committing.
    pub fn commit(&mut self) -> Option<EditCommit> {
        let state = std::mem::take(&mut self.state);
        let text = std::mem::take(&mut self.buffer).value();
        match state {
            EditState::Editing { row, key } => Some(EditCommit { row, key, text }),
            EditState::Viewing => None,
        }
    }

    /// Feeds a key to the editor.
    pub fn handle_key(&mut self, msg: &KeyMsg) -> EditOutcome {
        if !self.is_editing() {
            return EditOutcome::Ignored;
        }
        if self.keymap.commit.matches(msg) {
            return self
                .commit()
                .map(EditOutcome::Commit)
                .unwrap_or(EditOutcome::Ignored);
        }
        if self.keymap.cancel.matches(msg) {
            self.cancel();
            return EditOutcome::Cancelled;
        }
        self.buffer.handle_key(&self.keymap, msg);
        EditOutcome::Continue
    }
}
