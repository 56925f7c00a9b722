use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use percent_encoding::percent_decode_str;
use reqwest::{Response, Url};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use wordmem_config::network::NetworkConfig;
use wordmem_types::DownloadStatus;

use crate::error::NetError;

/// Streams remote files to disk with progress and cancellation.
#[derive(Clone)]
pub struct Downloader {
    client: reqwest::Client,
    read_timeout: Duration,
}

impl Downloader {
    pub fn new(config: &NetworkConfig) -> Result<Self, NetError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            read_timeout: config.read_timeout(),
        })
    }

    /// Download `url` into `dest`, returning the number of bytes written.
    ///
    /// The body goes to a hidden sibling file which is renamed over `dest`
    /// only after the last chunk. On any failure or cancellation that file
    /// is removed before the error is returned.
    pub async fn download_to_file<F>(
        &self,
        url: &str,
        dest: &Path,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<u64, NetError>
    where
        F: FnMut(DownloadStatus) + Send,
    {
        let url = parse_url(url)?;
        tracing::info!("Downloading {url} to {}", dest.display());

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(NetError::Cancelled),
            result = self.client.get(url.clone()).send() => result?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Download of {url} failed with status {status}");
            return Err(NetError::Remote {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        let part = partial_path(dest);
        let result = self
            .write_body(response, &part, dest, cancel, &mut on_progress)
            .await;

        if let Err(e) = &result {
            tracing::warn!("Download of {url} aborted: {e}");
            if let Err(rm) = fs::remove_file(&part).await
                && rm.kind() != io::ErrorKind::NotFound
            {
                tracing::error!("Failed to remove partial file {}: {rm}", part.display());
            }
        }

        result
    }

    async fn write_body<F>(
        &self,
        mut response: Response,
        part: &Path,
        dest: &Path,
        cancel: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<u64, NetError>
    where
        F: FnMut(DownloadStatus) + Send,
    {
        let total = response.content_length();
        let mut file = File::create(part).await.map_err(NetError::io(part))?;
        let mut bytes = 0u64;
        on_progress(DownloadStatus { bytes, total });

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(NetError::Cancelled),
                chunk = tokio::time::timeout(self.read_timeout, response.chunk()) => {
                    chunk.map_err(|_| {
                        NetError::Timeout(format!("no data received for {:?}", self.read_timeout))
                    })??
                }
            };

            let Some(chunk) = chunk else { break };
            file.write_all(&chunk).await.map_err(NetError::io(part))?;
            bytes += chunk.len() as u64;
            on_progress(DownloadStatus { bytes, total });
        }

        file.flush().await.map_err(NetError::io(part))?;
        drop(file);

        fs::rename(part, dest).await.map_err(NetError::io(dest))?;
        tracing::info!("Downloaded {bytes} bytes to {}", dest.display());
        Ok(bytes)
    }
}

fn parse_url(url: &str) -> Result<Url, NetError> {
    let parsed = Url::parse(url).map_err(|e| NetError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(NetError::InvalidUrl(format!("unsupported scheme '{scheme}' in {url}"))),
    }
}

/// Last path segment of `url`, percent-decoded.
pub fn file_name_from_url(url: &str) -> Result<String, NetError> {
    let parsed = parse_url(url)?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .filter(|name| !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\']))
        .ok_or_else(|| NetError::InvalidUrl(format!("no file name in {url}")))
}

/// Where a wordbook downloaded from `url` lands inside `dir`.
///
/// Creates `dir` if it is missing; fails if it exists but is not a directory.
pub async fn wordbook_destination(url: &str, dir: &Path) -> Result<PathBuf, NetError> {
    let name = file_name_from_url(url)?;

    match fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(NetError::Io {
                path: dir.to_path_buf(),
                source: io::Error::other("configured path is not a directory"),
            });
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).await.map_err(NetError::io(dir))?;
            tracing::info!("Created wordbook directory {}", dir.display());
        }
        Err(e) => return Err(NetError::io(dir)(e)),
    }

    Ok(dir.join(name))
}

fn partial_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}.{}.part", uuid::Uuid::new_v4()))
}

pub(crate) fn snippet(body: &str) -> String {
    body.chars().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        let name = file_name_from_url(
            "https://example.com/json/3-CET4-%E9%A1%BA%E5%BA%8F.json",
        )
        .unwrap();
        assert_eq!(name, "3-CET4-顺序.json");

        assert!(file_name_from_url("https://example.com/").is_err());
        assert!(file_name_from_url("ftp://example.com/a.json").is_err());
        assert!(file_name_from_url("not a url").is_err());
    }

    #[test]
    fn test_partial_path_is_hidden_sibling() {
        let part = partial_path(Path::new("/books/cet4.json"));
        assert_eq!(part.parent(), Some(Path::new("/books")));
        let name = part.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(".cet4.json."));
        assert!(name.ends_with(".part"));
    }

    #[tokio::test]
    async fn test_destination_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/books");

        let dest = wordbook_destination("https://example.com/cet4.json", &target)
            .await
            .unwrap();
        assert_eq!(dest, target.join("cet4.json"));
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_destination_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, "x").unwrap();

        let result = wordbook_destination("https://example.com/cet4.json", &file).await;
        assert!(matches!(result, Err(NetError::Io { .. })));
    }
}
