use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DOWNLOAD_URL: &str =
    "https://gitee.com/handcontent/english-vocabulary/raw/master/json/3-CET4-%E9%A1%BA%E5%BA%8F.json";
pub const DEFAULT_TTS_URL: &str = "https://dict.youdao.com/dictvoice";

fn default_download_url() -> String {
    DEFAULT_DOWNLOAD_URL.to_string()
}

fn default_tts_url() -> String {
    DEFAULT_TTS_URL.to_string()
}

fn default_tts_voice_type() -> u8 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_read_timeout_secs() -> u64 {
    60
}

fn default_tts_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("wordmem/", env!("CARGO_PKG_VERSION")).to_string()
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Remote endpoints and HTTP timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Where the prebuilt wordbook is downloaded from
    #[serde(default = "default_download_url")]
    pub download_url: String,
    /// Text-to-speech base URL, queried with `?audio=<word>&type=<voice>`
    #[serde(default = "default_tts_url")]
    pub tts_url: String,
    #[serde(default = "default_tts_voice_type")]
    pub tts_voice_type: u8,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Maximum silence between two body chunks of a download
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    /// Whole-request timeout for pronunciation fetches
    #[serde(default = "default_tts_timeout_secs")]
    pub tts_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self {
            download_url: env::var("WORDMEM_DOWNLOAD_URL")
                .unwrap_or_else(|_| default_download_url()),
            tts_url: env::var("WORDMEM_TTS_URL").unwrap_or_else(|_| default_tts_url()),
            tts_voice_type: default_tts_voice_type(),
            connect_timeout_secs: env_or(
                "WORDMEM_CONNECT_TIMEOUT_SECS",
                default_connect_timeout_secs(),
            ),
            read_timeout_secs: env_or("WORDMEM_READ_TIMEOUT_SECS", default_read_timeout_secs()),
            tts_timeout_secs: env_or("WORDMEM_TTS_TIMEOUT_SECS", default_tts_timeout_secs()),
            user_agent: default_user_agent(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn tts_timeout(&self) -> Duration {
        Duration::from_secs(self.tts_timeout_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            download_url: default_download_url(),
            tts_url: default_tts_url(),
            tts_voice_type: default_tts_voice_type(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            tts_timeout_secs: default_tts_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
