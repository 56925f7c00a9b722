use serde::{Deserialize, Serialize};

fn default_words_per_page() -> usize {
    50
}

fn default_max_words_per_page() -> usize {
    500
}

fn default_play_audio() -> bool {
    true
}

fn default_translation_mask() -> String {
    "****".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_words_per_page")]
    pub default_words_per_page: usize,
    /// Upper bound offered by the page-size selector
    #[serde(default = "default_max_words_per_page")]
    pub max_words_per_page: usize,
    /// Shown in place of a translation while translations are hidden
    #[serde(default = "default_translation_mask")]
    pub translation_mask: String,
    #[serde(default)]
    pub hide_translations: bool,
    /// Play pronunciations after fetching them
    #[serde(default = "default_play_audio")]
    pub play_audio: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_words_per_page: default_words_per_page(),
            max_words_per_page: default_max_words_per_page(),
            translation_mask: default_translation_mask(),
            hide_translations: false,
            play_audio: default_play_audio(),
        }
    }
}
