use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// One normalized (word, translation) pair.
///
/// Identity is the word alone: two entries with the same word compare equal
/// and hash identically even when their translations differ. Putting entries
/// into a set or map therefore keeps only one translation per word.
#[derive(Debug, Clone)]
pub struct WordEntry {
    word: String,
    translation: String,
}

impl WordEntry {
    pub fn new(word: impl AsRef<str>, translation: impl AsRef<str>) -> Self {
        Self {
            word: word.as_ref().trim().to_string(),
            translation: translation.as_ref().trim().to_string(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }
}

impl PartialEq for WordEntry {
    fn eq(&self, other: &Self) -> bool {
        self.word == other.word
    }
}

impl Eq for WordEntry {}

impl Hash for WordEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.word.hash(state);
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Re-scan the wordbook directory
    RefreshWordbooks,
    /// Load a wordbook by file name from the configured directory
    LoadWordbook(String),
    NextPage,
    PreviousPage,
    GoToPage(i64),
    SetPageSize(i64),
    /// Show a random sample drawn from the whole wordbook, `None` uses the page size
    Sample(Option<i64>),
    /// Show the current page again (leaves sample mode)
    ShowCurrentPage,
    HideTranslations(bool),
    /// Reveal one word's translation while translations are hidden
    Reveal(String),
    Pronounce(String),
    DownloadWordbook {
        url: Option<String>,
    },
    CancelDownload,
    Quit,

    // app -> ui
    ShowPage(PageView),
    WordbookList {
        names: Vec<String>,
        selected: Option<String>,
    },
    DownloadProgress(DownloadStatus),
    PronunciationReady {
        word: String,
        path: PathBuf,
    },
    Notice {
        level: NoticeLevel,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A rendered page, translations already masked if hiding is on.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub rows: Vec<DisplayRow>,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// True when the rows are a random sample rather than a page
    pub sampled: bool,
}

impl PageView {
    pub fn page_label(&self) -> String {
        if self.total_pages == 0 {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", self.current_page, self.total_pages)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub word: String,
    pub translation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStatus {
    pub bytes: u64,
    pub total: Option<u64>,
}

impl DownloadStatus {
    /// Completed fraction in `0.0..=1.0`, `None` when the size is unknown.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some((self.bytes as f64 / total as f64).min(1.0)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_entry_trims_fields() {
        let entry = WordEntry::new("  ability ", " n. ability\n");
        assert_eq!(entry.word(), "ability");
        assert_eq!(entry.translation(), "n. ability");
    }

    #[test]
    fn test_entry_identity_is_word_only() {
        let a = WordEntry::new("bank", "n. river side");
        let b = WordEntry::new("bank", "n. financial institution");
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_page_label_empty() {
        let view = PageView {
            rows: vec![],
            current_page: 1,
            total_pages: 0,
            has_previous: false,
            has_next: false,
            sampled: false,
        };
        assert_eq!(view.page_label(), "0 / 0");
    }

    #[test]
    fn test_download_fraction() {
        let known = DownloadStatus { bytes: 50, total: Some(200) };
        assert_eq!(known.fraction(), Some(0.25));

        let unknown = DownloadStatus { bytes: 50, total: None };
        assert_eq!(unknown.fraction(), None);
    }
}
