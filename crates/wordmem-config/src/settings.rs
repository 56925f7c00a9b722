//! Flat key-value persistence for the study session.
//!
//! The store is an explicit instance created at startup and handed to
//! whoever needs it. Values live in a single JSON object; integers are
//! accepted either as numbers or as numeric strings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

pub const WORDBOOK_DIRECTORY_KEY: &str = "wordmemorizer.wordbook.directory";
pub const CURRENT_PAGE_KEY: &str = "wordmemorizer.pagination.currentPage";
pub const WORDS_PER_PAGE_KEY: &str = "wordmemorizer.pagination.wordsPerPage";
pub const SELECTED_WORDBOOK_KEY: &str = "wordmemorizer.selectedWordbook";

pub const DEFAULT_CURRENT_PAGE: usize = 1;
pub const DEFAULT_WORDS_PER_PAGE: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct SettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
    default_directory: PathBuf,
    default_words_per_page: usize,
}

impl SettingsStore {
    /// Open the store at `path`. A missing file yields an empty store.
    pub fn open(
        path: impl Into<PathBuf>,
        default_directory: impl Into<PathBuf>,
        default_words_per_page: usize,
    ) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(data) if data.trim().is_empty() => Map::new(),
            Ok(data) => serde_json::from_str(&data).map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No settings at {}, starting fresh", path.display());
                Map::new()
            }
            Err(source) => return Err(SettingsError::Io { path, source }),
        };

        Ok(Self {
            path,
            values,
            default_directory: default_directory.into(),
            default_words_per_page: default_words_per_page.max(1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .insert(key.to_string(), Value::String(value.into()));
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), Value::from(value));
    }

    pub fn wordbook_directory(&self) -> PathBuf {
        match self.get_string(WORDBOOK_DIRECTORY_KEY) {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => self.default_directory.clone(),
        }
    }

    pub fn set_wordbook_directory(&mut self, directory: &Path) {
        self.set_string(WORDBOOK_DIRECTORY_KEY, directory.to_string_lossy());
    }

    pub fn current_page(&self) -> usize {
        to_positive(self.get_int(CURRENT_PAGE_KEY, DEFAULT_CURRENT_PAGE as i64))
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.set_int(CURRENT_PAGE_KEY, page.max(1) as i64);
    }

    pub fn words_per_page(&self) -> usize {
        to_positive(self.get_int(WORDS_PER_PAGE_KEY, self.default_words_per_page as i64))
    }

    pub fn set_words_per_page(&mut self, count: usize) {
        self.set_int(WORDS_PER_PAGE_KEY, count.max(1) as i64);
    }

    pub fn selected_wordbook(&self) -> Option<String> {
        self.get_string(SELECTED_WORDBOOK_KEY)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
    }

    /// Blank or `None` clears the selection.
    pub fn set_selected_wordbook(&mut self, name: Option<&str>) {
        let name = name.map(str::trim).unwrap_or_default();
        self.set_string(SELECTED_WORDBOOK_KEY, name);
    }

    /// Write the store through a temp file so readers never see half a file.
    pub fn save(&self) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let data = serde_json::to_string_pretty(&self.values).map_err(|source| {
            SettingsError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

fn to_positive(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_in(dir: &Path) -> SettingsStore {
        SettingsStore::open(dir.join("settings.json"), dir.join("books"), 50).unwrap()
    }

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(dir.path());

        assert_eq!(store.current_page(), 1);
        assert_eq!(store.words_per_page(), 50);
        assert_eq!(store.selected_wordbook(), None);
        assert_eq!(store.wordbook_directory(), dir.path().join("books"));
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(dir.path());
        store.set_current_page(3);
        store.set_words_per_page(25);
        store.set_selected_wordbook(Some("cet4.json"));
        store.set_wordbook_directory(Path::new("/tmp/books"));
        store.save().unwrap();

        let reopened = open_in(dir.path());
        assert_eq!(reopened.current_page(), 3);
        assert_eq!(reopened.words_per_page(), 25);
        assert_eq!(reopened.selected_wordbook().as_deref(), Some("cet4.json"));
        assert_eq!(reopened.wordbook_directory(), PathBuf::from("/tmp/books"));
    }

    #[test]
    fn test_pages_are_at_least_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(dir.path());
        store.set_current_page(0);
        store.set_words_per_page(0);
        assert_eq!(store.current_page(), 1);
        assert_eq!(store.words_per_page(), 1);

        store.set_int(CURRENT_PAGE_KEY, -4);
        assert_eq!(store.current_page(), 1);
    }

    #[test]
    fn test_blank_selection_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(dir.path());
        store.set_selected_wordbook(Some("   "));
        assert_eq!(store.selected_wordbook(), None);
        assert_eq!(store.get_string(SELECTED_WORDBOOK_KEY), Some(""));
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"wordmemorizer.pagination.wordsPerPage": "30"}"#).unwrap();

        let store = SettingsStore::open(&path, dir.path(), 50).unwrap();
        assert_eq!(store.words_per_page(), 30);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2").unwrap();

        let result = SettingsStore::open(&path, dir.path(), 50);
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }
}
