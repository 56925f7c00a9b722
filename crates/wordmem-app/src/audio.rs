use std::path::{Path, PathBuf};

use anyhow::Context;

/// Whether this build can play audio at all.
pub const PLAYBACK_ENABLED: bool = cfg!(feature = "playback");

/// Play an mp3 file on the default output device, returning once it finishes.
pub async fn play_file(path: PathBuf) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || play_blocking(&path))
        .await
        .context("audio task failed")?
}

#[cfg(feature = "playback")]
fn play_blocking(path: &Path) -> anyhow::Result<()> {
    use std::fs::File;
    use std::io::BufReader;

    use rodio::{Decoder, OutputStream, Sink};

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .with_context(|| format!("failed to decode {}", path.display()))?;

    // the stream must outlive the sink
    let (_stream, handle) = OutputStream::try_default().context("no audio output device")?;
    let sink = Sink::try_new(&handle).context("failed to open audio sink")?;
    sink.append(source);
    sink.sleep_until_end();

    tracing::debug!("Played {}", path.display());
    Ok(())
}

#[cfg(not(feature = "playback"))]
fn play_blocking(path: &Path) -> anyhow::Result<()> {
    anyhow::bail!(
        "built without the `playback` feature, audio left at {}",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "playback"))]
    #[tokio::test]
    async fn test_play_without_feature_reports_path() {
        let err = play_file(PathBuf::from("/tmp/abandon.mp3")).await.unwrap_err();
        assert!(format!("{err:#}").contains("abandon.mp3"));
    }

    #[cfg(feature = "playback")]
    #[tokio::test]
    async fn test_play_rejects_non_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        std::fs::write(&path, b"not audio").unwrap();

        assert!(play_file(path).await.is_err());
    }
}
