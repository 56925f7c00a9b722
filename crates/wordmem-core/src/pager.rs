use rand::Rng;
use rand::seq::SliceRandom;
use wordmem_types::WordEntry;

use crate::error::CoreError;

/// Paginated view over a loaded wordbook.
///
/// `total_pages` is always derived from the entry count and page size;
/// `current_page` stays within `1..=max(1, total_pages)`.
#[derive(Debug, Clone)]
pub struct WordBrowser {
    entries: Vec<WordEntry>,
    page_size: usize,
    current_page: usize,
}

impl WordBrowser {
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.entries.len().div_ceil(self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Replace the list wholesale and return to the first page.
    pub fn set_entries(&mut self, entries: Vec<WordEntry>) {
        self.entries = entries;
        self.current_page = 1;
    }

    pub fn set_page_size(&mut self, size: i64) -> Result<(), CoreError> {
        let size = usize::try_from(size)
            .ok()
            .filter(|&size| size >= 1)
            .ok_or_else(|| CoreError::InvalidArgument(format!("page size must be >= 1, got {size}")))?;

        self.page_size = size;
        self.current_page = 1;
        Ok(())
    }

    /// Clamp `page` into the valid range and move there. Returns the new page.
    pub fn go_to_page(&mut self, page: i64) -> usize {
        if self.entries.is_empty() {
            return self.current_page;
        }

        let last = self.total_pages().max(1);
        self.current_page = usize::try_from(page).unwrap_or(0).clamp(1, last);
        self.current_page
    }

    pub fn next_page(&mut self) -> bool {
        if self.has_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.has_previous() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn current_slice(&self) -> &[WordEntry] {
        if self.entries.is_empty() {
            return &[];
        }

        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.entries.len());
        self.entries.get(start..end).unwrap_or_default()
    }

    /// Up to `count` distinct entries from the whole list, in random order.
    pub fn sample(&self, count: i64) -> Vec<WordEntry> {
        self.sample_with(count, &mut rand::rng())
    }

    pub fn sample_with<R: Rng + ?Sized>(&self, count: i64, rng: &mut R) -> Vec<WordEntry> {
        let Ok(count) = usize::try_from(count) else {
            return Vec::new();
        };
        if count == 0 {
            return Vec::new();
        }

        let mut shuffled = self.entries.clone();
        shuffled.shuffle(rng);
        shuffled.truncate(count);
        shuffled
    }
}
