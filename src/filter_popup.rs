//! The free-form filter popup.
//!
//! The popup shows one input per [`FilterField`]. Text and date fields are
//! typed into; select fields cycle through their options, with "All" meaning
//! no filter. Nothing takes effect until the popup is applied.

use crate::column::{FilterOption, FilterType};
use crate::editor::{EditorKeyMap, TextBuffer};
use crate::key::{new_binding, with_help, with_keys_str, Binding, KeyMap};
use bubbletea_rs::KeyMsg;
use std::collections::BTreeMap;

/// Filter values keyed by field name. Empty values mean "no filter".
pub type FilterValues = BTreeMap<String, String>;

/// One input of the filter popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    /// Name the value is stored under; usually a column key.
    pub name: String,
    /// Label shown next to the input.
    pub label: String,
    /// Input kind.
    pub field_type: FilterType,
    /// Choices for select fields.
    pub options: Vec<FilterOption>,
}

impl FilterField {
    /// A free-text field.
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type: FilterType::Text,
            options: Vec::new(),
        }
    }

    /// A date field, typed as `YYYY-MM-DD`.
    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field_type: FilterType::Date,
            ..Self::text(name, label)
        }
    }

    /// A select field.
    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Self {
        Self {
            field_type: FilterType::Select,
            options,
            ..Self::text(name, label)
        }
    }

    /// Placeholder text for an empty input.
    pub fn placeholder(&self) -> String {
        match self.field_type {
            FilterType::Select => format!("Select {}", self.label.to_lowercase()),
            FilterType::Date => "YYYY-MM-DD".to_string(),
            FilterType::Text => format!("Filter by {}", self.label.to_lowercase()),
        }
    }
}

/// Key bindings of the filter popup.
#[derive(Debug, Clone)]
pub struct FilterPopupKeyMap {
    /// Focus the previous field.
    pub prev_field: Binding,
    /// Focus the next field.
    pub next_field: Binding,
    /// Previous select option.
    pub prev_option: Binding,
    /// Next select option.
    pub next_option: Binding,
    /// Clear every value.
    pub reset: Binding,
    /// Apply the values and close.
    pub apply: Binding,
    /// Close without applying.
    pub close: Binding,
}

impl Default for FilterPopupKeyMap {
    fn default() -> Self {
        Self {
            prev_field: new_binding(vec![with_keys_str(&["up"]), with_help("↑", "prev field")]),
            next_field: new_binding(vec![
                with_keys_str(&["down", "tab"]),
                with_help("↓/tab", "next field"),
            ]),
            prev_option: new_binding(vec![
                with_keys_str(&["left"]),
                with_help("←", "prev option"),
            ]),
            next_option: new_binding(vec![
                with_keys_str(&["right"]),
                with_help("→", "next option"),
            ]),
            reset: new_binding(vec![with_keys_str(&["ctrl+r"]), with_help("ctrl+r", "reset")]),
            apply: new_binding(vec![with_keys_str(&["enter"]), with_help("enter", "apply filter")]),
            close: new_binding(vec![with_keys_str(&["esc"]), with_help("esc", "close")]),
        }
    }
}

impl KeyMap for FilterPopupKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next_field, &self.reset, &self.apply, &self.close]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.prev_field, &self.next_field, &self.prev_option, &self.next_option],
            vec![&self.reset, &self.apply, &self.close],
        ]
    }
}

/// What a key did to the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupOutcome {
    /// The popup is closed; the key was not used.
    Ignored,
    /// The popup consumed the key.
    Continue,
    /// The popup was applied with these values and closed.
    Applied(FilterValues),
    /// The popup was closed without applying.
    Closed,
}

/// Popup state: open flag, focused field, and draft values.
#[derive(Debug, Clone, Default)]
pub struct FilterPopup {
    fields: Vec<FilterField>,
    values: FilterValues,
    open: bool,
    focus: usize,
    input: TextBuffer,
    /// Key bindings.
    pub keymap: FilterPopupKeyMap,
    text_keys: EditorKeyMap,
}

impl FilterPopup {
    /// Creates a closed popup for `fields`.
    pub fn new(fields: Vec<FilterField>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// The configured fields.
    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    /// True when at least one field is configured.
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// The draft values.
    pub fn values(&self) -> &FilterValues {
        &self.values
    }

    /// The draft value of one field.
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// True while the popup is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Index of the focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// The text input of the focused text or date field.
    pub fn input(&self) -> &TextBuffer {
        &self.input
    }

    /// Shows the popup, keeping the draft values.
    pub fn open(&mut self) {
        self.open = true;
        self.focus_field(self.focus.min(self.fields.len().saturating_sub(1)));
    }

    /// Hides the popup, keeping the draft values.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Shows or hides the popup.
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Sets a draft value. Unknown field names are ignored.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if self.fields.iter().any(|f| f.name == name) {
            self.values.insert(name.to_string(), value.into());
            if self.focused().is_some_and(|f| f.name == name) {
                self.input = TextBuffer::new(self.value(name));
            }
        }
    }

    /// Clears every draft value.
    pub fn reset(&mut self) {
        self.values.clear();
        self.input = TextBuffer::default();
    }

    /// The non-empty draft values, as applied.
    pub fn applied_values(&self) -> FilterValues {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Closes the popup and returns the values to apply.
    pub fn apply(&mut self) -> FilterValues {
        self.close();
        self.applied_values()
    }

    fn focused(&self) -> Option<&FilterField> {
        self.fields.get(self.focus)
    }

    fn focus_field(&mut self, index: usize) {
        self.focus = index;
        let text = self
            .focused()
            .map(|f| self.value(&f.name).to_string())
            .unwrap_or_default();
        self.input = TextBuffer::new(&text);
    }

    fn cycle_option(&mut self, forward: bool) {
        let Some(field) = self.focused() else {
            return;
        };
        if field.field_type != FilterType::Select {
            return;
        }
        // "All" (empty) followed by each option.
        let mut choices = vec![String::new()];
        choices.extend(field.options.iter().map(|o| o.value.clone()));
        let name = field.name.clone();
        let current = choices.iter().position(|c| c == self.value(&name)).unwrap_or(0);
        let next = if forward {
            (current + 1) % choices.len()
        } else {
            (current + choices.len() - 1) % choices.len()
        };
        self.values.insert(name, choices[next].clone());
    }

    /// Feeds a key to the popup.
    pub fn handle_key(&mut self, msg: &KeyMsg) -> PopupOutcome {
        if !self.open {
            return PopupOutcome::Ignored;
        }
        if self.keymap.close.matches(msg) {
            self.close();
            return PopupOutcome::Closed;
        }
        if self.keymap.apply.matches(msg) {
            return PopupOutcome::Applied(self.apply());
        }
        if self.keymap.reset.matches(msg) {
            self.reset();
            return PopupOutcome::Continue;
        }
        if self.fields.is_empty() {
            return PopupOutcome::Continue;
        }
        if self.keymap.next_field.matches(msg) {
            self.focus_field((self.focus + 1) % self.fields.len());
            return PopupOutcome::Continue;
        }
        if self.keymap.prev_field.matches(msg) {
            self.focus_field((self.focus + self.fields.len() - 1) % self.fields.len());
            return PopupOutcome::Continue;
        }

        let is_select = self
            .focused()
            .is_some_and(|f| f.field_type == FilterType::Select);
        if is_select {
            if self.keymap.next_option.matches(msg) {
                self.cycle_option(true);
            } else if self.keymap.prev_option.matches(msg) {
                self.cycle_option(false);
            }
        } else if self.input.handle_key(&self.text_keys, msg) {
            if let Some(name) = self.focused().map(|f| f.name.clone()) {
                self.values.insert(name, self.input.value());
            }
        }
        PopupOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn popup() -> FilterPopup {
        FilterPopup::new(vec![
            FilterField::text("customer", "Customer"),
            FilterField::select(
                "status",
                "Status",
                vec![FilterOption::new("Fresh", "Fresh"), FilterOption::new("Draft", "Draft")],
            ),
            FilterField::date("date", "Date"),
        ])
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut p = popup();
        assert_eq!(p.handle_key(&key(KeyCode::Char('a'))), PopupOutcome::Ignored);
        assert!(p.values().is_empty());
    }

    #[test]
    fn test_typing_and_apply() {
        let mut p = popup();
        p.open();
        for c in "acme".chars() {
            p.handle_key(&key(KeyCode::Char(c)));
        }
        p.handle_key(&key(KeyCode::Down));
        p.handle_key(&key(KeyCode::Right));

        let outcome = p.handle_key(&key(KeyCode::Enter));
        let mut expected = FilterValues::new();
        expected.insert("customer".into(), "acme".into());
        expected.insert("status".into(), "Fresh".into());
        assert_eq!(outcome, PopupOutcome::Applied(expected));
        assert!(!p.is_open());
    }

    #[test]
    fn test_select_cycles_through_all() {
        let mut p = popup();
        p.open();
        p.handle_key(&key(KeyCode::Down));
        p.handle_key(&key(KeyCode::Left));
        assert_eq!(p.value("status"), "Draft");
        p.handle_key(&key(KeyCode::Right));
        assert_eq!(p.value("status"), "");
        assert!(p.applied_values().is_empty());
    }

    #[test]
    fn test_reset_clears_values() {
        let mut p = popup();
        p.set_value("customer", "x");
        p.set_value("nope", "y");
        assert_eq!(p.values().len(), 1);
        p.open();
        p.handle_key(&KeyMsg {
            key: KeyCode::Char('r'),
            modifiers: KeyModifiers::CONTROL,
        });
        assert!(p.values().is_empty());
        assert!(p.is_open());
    }

    #[test]
    fn test_focus_reloads_input() {
        let mut p = popup();
        p.set_value("date", "2024-11-05");
        p.open();
        p.handle_key(&key(KeyCode::Up));
        assert_eq!(p.focus(), 2);
        assert_eq!(p.input().value(), "2024-11-05");
        p.handle_key(&key(KeyCode::Backspace));
        assert_eq!(p.value("date"), "2024-11-0");
    }

    #[test]
    fn test_escape_keeps_drafts() {
        let mut p = popup();
        p.open();
        p.handle_key(&key(KeyCode::Char('z')));
        assert_eq!(p.handle_key(&key(KeyCode::Esc)), PopupOutcome::Closed);
        assert_eq!(p.value("customer"), "z");
        assert_eq!(p.fields()[0].placeholder(), "Filter by customer");
        assert_eq!(p.fields()[1].placeholder(), "Select status");
    }
}
