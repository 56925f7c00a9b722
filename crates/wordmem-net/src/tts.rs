use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tokio::fs;
use wordmem_config::network::NetworkConfig;

use crate::download::snippet;
use crate::error::NetError;

/// Fetched pronunciation audio for one word.
#[derive(Debug, Clone)]
pub struct Pronunciation {
    pub word: String,
    pub content_type: String,
    pub audio: Vec<u8>,
}

impl Pronunciation {
    /// Store the audio as `<dir>/<word>.mp3` and return the path.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, NetError> {
        fs::create_dir_all(dir).await.map_err(NetError::io(dir))?;
        let path = dir.join(format!("{}.mp3", audio_file_stem(&self.word)));
        fs::write(&path, &self.audio).await.map_err(NetError::io(&path))?;
        Ok(path)
    }
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub base_url: String,
}

/// Text-to-speech provider interface
#[async_trait]
pub trait Pronouncer: Send + Sync {
    /// Fetch pronunciation audio for a single word
    async fn pronounce(&self, word: &str) -> Result<Pronunciation, NetError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

/// Youdao dictvoice endpoint: `GET <base>?audio=<word>&type=<voice>`.
#[derive(Clone)]
pub struct YoudaoPronouncer {
    client: reqwest::Client,
    base_url: String,
    voice_type: u8,
}

impl YoudaoPronouncer {
    pub fn new(config: &NetworkConfig) -> Result<Self, NetError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.tts_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.tts_url.clone(),
            voice_type: config.tts_voice_type,
        })
    }
}

#[async_trait]
impl Pronouncer for YoudaoPronouncer {
    async fn pronounce(&self, word: &str) -> Result<Pronunciation, NetError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(NetError::EmptyWord);
        }

        tracing::info!("Sending TTS request for word: {word}");
        let voice_type = self.voice_type.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("audio", word), ("type", voice_type.as_str())])
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        tracing::debug!("TTS response status: {status}, Content-Type: {content_type}");

        if status.as_u16() == 200 && content_type.contains("audio/mpeg") {
            let audio = response.bytes().await?.to_vec();
            return Ok(Pronunciation {
                word: word.to_string(),
                content_type,
                audio,
            });
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("TTS error for '{word}'. Status: {status}, Content-Type: {content_type}");
        Err(NetError::Remote {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Youdao".to_string(),
            base_url: self.base_url.clone(),
        }
    }
}

fn error_message(status: u16, body: &str) -> String {
    let mut message = format!("server returned error {status}.");
    if body.is_empty() {
        return message;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("errorCode") {
            Some(Value::String(code)) => message.push_str(&format!(" error code: {code}")),
            Some(code) => message.push_str(&format!(" error code: {code}")),
            None => message.push_str(&format!(" response body: {}", snippet(body))),
        },
        _ => message.push_str(" could not parse error response."),
    }
    message
}

/// File stem for a word's cached audio. Also the key for running fetches,
/// so words that would share a file are never fetched concurrently.
pub fn audio_file_stem(word: &str) -> String {
    word.trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '\'' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_with_code() {
        let message = error_message(500, r#"{"errorCode": "108"}"#);
        assert_eq!(message, "server returned error 500. error code: 108");

        let numeric = error_message(500, r#"{"errorCode": 202}"#);
        assert!(numeric.ends_with("error code: 202"));
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(404, ""), "server returned error 404.");
        assert!(error_message(502, "<html>bad gateway</html>").ends_with("could not parse error response."));

        let long = format!(r#"{{"detail": "{}"}}"#, "x".repeat(300));
        let message = error_message(400, &long);
        let body = message.split(" response body: ").nth(1).unwrap();
        assert_eq!(body.chars().count(), 100);
    }

    #[test]
    fn test_audio_file_stem() {
        assert_eq!(audio_file_stem("ice cream"), "ice_cream");
        assert_eq!(audio_file_stem("don't"), "don't");
        assert_eq!(audio_file_stem("../etc"), "___etc");
        assert_eq!(audio_file_stem(" Apple "), audio_file_stem("apple"));
        assert_eq!(audio_file_stem("ice cream"), audio_file_stem("ice_cream"));
    }
}
