// Client-side pagination over an in-memory list.

/// Splits a list into fixed-size pages and tracks the current one.
///
/// Pages are 1-based. Moves outside `1..=total_pages()` are ignored.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    items_per_page: usize,
    current_page: usize,
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 10)
    }
}

impl<T> Paginator<T> {
    /// Create a paginator on page 1. A page size of 0 is treated as 1.
    pub fn new(items: Vec<T>, items_per_page: usize) -> Self {
        Self {
            items,
            items_per_page: items_per_page.max(1),
            current_page: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// `ceil(len / items_per_page)`, 0 for an empty list.
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.items_per_page)
    }

    /// Items on the current page.
    pub fn displayed_items(&self) -> &[T] {
        let start = (self.current_page - 1) * self.items_per_page;
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.items_per_page).min(self.items.len());
        &self.items[start..end]
    }

    /// 1-based inclusive range of the items shown, for "11-20 of 57".
    pub fn page_range(&self) -> Option<(usize, usize)> {
        let shown = self.displayed_items().len();
        if shown == 0 {
            return None;
        }
        let start = (self.current_page - 1) * self.items_per_page + 1;
        Some((start, start + shown - 1))
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Go to the previous page. Returns whether the page changed.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Go to the next page. Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`. Out-of-range pages leave the current page unchanged.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.total_pages())
    }

    /// Replace the list and return to page 1.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.current_page = 1;
    }

    /// Change the page size, keeping the first visible item on screen.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        let first_index = (self.current_page - 1) * self.items_per_page;
        self.items_per_page = items_per_page.max(1);
        self.current_page = (first_index / self.items_per_page + 1).min(self.total_pages().max(1));
    }
}
