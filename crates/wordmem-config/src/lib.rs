use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::network::NetworkConfig;
use self::settings::SettingsError;
use self::ui::UiConfig;
use self::wordbook::WordbookConfig;

pub mod network;
pub mod settings;
pub mod ui;
pub mod wordbook;

pub use settings::SettingsStore;

fn default_settings_path() -> PathBuf {
    env::var_os("WORDMEM_SETTINGS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            env::var_os("HOME")
                .or_else(|| env::var_os("USERPROFILE"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".wordmem")
                .join("settings.json")
        })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub ui: UiConfig,
    pub wordbook: WordbookConfig,
    /// Key-value file holding the persisted session
    pub settings_path: PathBuf,
}

impl Config {
    /// Defaults overridden by `WORDMEM_*` environment variables.
    pub fn new() -> Self {
        Config {
            network: NetworkConfig::new(),
            ui: UiConfig::default(),
            wordbook: WordbookConfig::new(),
            settings_path: default_settings_path(),
        }
    }

    /// Load a JSON config file. Missing fields fall back to [`Config::new`].
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        tracing::info!("Loading config from {}", path.display());
        let data = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
