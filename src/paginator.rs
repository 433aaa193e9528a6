//! A paginator for the grid's page cursor.
//!
//! The grid spreads its processed rows over a fixed number of pages (see
//! [`crate::pipeline::page_bounds`]); this component tracks which page is
//! current and lays out the pagination control: previous/next links and a
//! bounded window of page numbers, elided with `…` at either end.

use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::KeyMsg;

/// Number of page links shown when none is configured.
pub const DEFAULT_PAGE_WINDOW: usize = 5;

/// One element of the rendered pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// Link to the previous page.
    Prev {
        /// False on the first page.
        enabled: bool,
    },
    /// Link to a page number.
    Page {
        /// 1-based page number.
        number: usize,
        /// True for the current page.
        active: bool,
    },
    /// Pages elided from the window.
    Ellipsis,
    /// Link to the next page.
    Next {
        /// False on the last page.
        enabled: bool,
    },
}

/// Key bindings for page navigation.
///
/// ```rust
/// use bubbletea_datagrid::key::KeyMap;
/// use bubbletea_datagrid::paginator::PaginatorKeyMap;
///
/// let keymap = PaginatorKeyMap::default();
/// assert_eq!(keymap.short_help().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PaginatorKeyMap {
    /// Previous page. Default keys: PageUp, '['
    pub prev_page: key::Binding,
    /// Next page. Default keys: PageDown, ']'
    pub next_page: key::Binding,
}

impl Default for PaginatorKeyMap {
    fn default() -> Self {
        Self {
            prev_page: key::new_binding(vec![
                key::with_keys_str(&["pgup", "["]),
                key::with_help("pgup/[", "prev page"),
            ]),
            next_page: key::new_binding(vec![
                key::with_keys_str(&["pgdown", "]"]),
                key::with_help("pgdn/]", "next page"),
            ]),
        }
    }
}

impl KeyMapTrait for PaginatorKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev_page, &self.next_page]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.prev_page, &self.next_page]]
    }
}

/// Pagination state.
///
/// Pages are 1-based.
///
/// # Examples
///
/// ```rust
/// use bubbletea_datagrid::paginator::Model;
///
/// let mut paginator = Model::new().with_total_pages(12).with_window(5);
/// paginator.set_page(6);
/// assert_eq!(paginator.window_bounds(), (4, 8));
///
/// paginator.next_page();
/// assert_eq!(paginator.current_page, 7);
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    /// The current page, starting at 1.
    pub current_page: usize,
    /// The total number of pages, at least 1.
    pub total_pages: usize,
    /// Maximum number of page links shown at once.
    pub window: usize,
    /// Key bindings.
    pub keymap: PaginatorKeyMap,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            window: DEFAULT_PAGE_WINDOW,
            keymap: PaginatorKeyMap::default(),
        }
    }
}

impl Model {
    /// Creates a single-page paginator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total number of pages (builder pattern).
    pub fn with_total_pages(mut self, pages: usize) -> Self {
        self.set_total_pages(pages);
        self
    }

    /// Sets the size of the page-link window (builder pattern).
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    /// Sets the total number of pages, clamping the current page into range.
    pub fn set_total_pages(&mut self, pages: usize) {
        self.total_pages = pages.max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    /// Moves to `page`, clamped into `1..=total_pages`.
    ///
    /// Returns true when the current page changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let page = page.clamp(1, self.total_pages);
        let changed = page != self.current_page;
        self.current_page = page;
        changed
    }

    /// Moves back a page. Returns true when the page changed.
    pub fn prev_page(&mut self) -> bool {
        if self.on_first_page() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Moves forward a page. Returns true when the page changed.
    pub fn next_page(&mut self) -> bool {
        if self.on_last_page() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// True on page 1.
    pub fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    /// True on the last page.
    pub fn on_last_page(&self) -> bool {
        self.current_page >= self.total_pages
    }

    /// The first and last page numbers of the visible window.
    pub fn window_bounds(&self) -> (usize, usize) {
        let window = self.window.max(1);
        if self.total_pages <= window {
            return (1, self.total_pages);
        }
        let half = window / 2;
        let start = self
            .current_page
            .saturating_sub(half)
            .clamp(1, self.total_pages - window + 1);
        (start, start + window - 1)
    }

    /// The elements of the pagination control in display order.
    pub fn links(&self) -> Vec<PageLink> {
        let (start, end) = self.window_bounds();
        let mut links = vec![PageLink::Prev {
            enabled: !self.on_first_page(),
        }];
        if start > 1 {
            links.push(PageLink::Ellipsis);
        }
        links.extend((start..=end).map(|number| PageLink::Page {
            number,
            active: number == self.current_page,
        }));
        if end < self.total_pages {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Next {
            enabled: !self.on_last_page(),
        });
        links
    }

    /// Handles page navigation keys. Returns true when the current page changed.
    pub fn handle_key(&mut self, key_msg: &KeyMsg) -> bool {
        if self.keymap.next_page.matches(key_msg) {
            self.next_page()
        } else if self.keymap.prev_page.matches(key_msg) {
            self.prev_page()
        } else {
            false
        }
    }
}
