use wordmem_types::{DisplayRow, PageView, WordEntry};

use crate::pager::WordBrowser;

/// Render the browser's current page, masking translations when `hidden`.
pub fn page_view(browser: &WordBrowser, hidden: bool, mask: &str) -> PageView {
    PageView {
        rows: rows(browser.current_slice(), hidden, mask),
        current_page: browser.current_page(),
        total_pages: browser.total_pages(),
        has_previous: browser.has_previous(),
        has_next: browser.has_next(),
        sampled: false,
    }
}

/// Render an arbitrary selection (a random sample) with the page controls of `browser`.
pub fn sample_view(browser: &WordBrowser, sample: &[WordEntry], hidden: bool, mask: &str) -> PageView {
    PageView {
        rows: rows(sample, hidden, mask),
        sampled: true,
        ..page_view(browser, hidden, mask)
    }
}

fn rows(entries: &[WordEntry], hidden: bool, mask: &str) -> Vec<DisplayRow> {
    entries
        .iter()
        .map(|entry| DisplayRow {
            word: entry.word().to_string(),
            translation: if hidden {
                mask.to_string()
            } else {
                entry.translation().to_string()
            },
        })
        .collect()
}
