use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_directory() -> PathBuf {
    home_dir().join(".wordmemorizer_books")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordbookConfig {
    /// Directory scanned for `*.json` wordbooks, unless overridden in settings
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Where fetched pronunciations are stored; defaults to `<directory>/.audio`
    #[serde(default)]
    pub audio_cache_dir: Option<PathBuf>,
}

impl WordbookConfig {
    pub fn new() -> Self {
        let directory = env::var_os("WORDMEM_WORDBOOK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_directory);

        Self {
            directory,
            audio_cache_dir: env::var_os("WORDMEM_AUDIO_DIR").map(PathBuf::from),
        }
    }
}

impl Default for WordbookConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            audio_cache_dir: None,
        }
    }
}
