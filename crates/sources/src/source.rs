//! Channel video sources
//!
//! A [`ChannelVideoSource`] lists the most recent videos of one channel.
//! The feed never talks to a metadata provider directly; it is handed a
//! source, which keeps the fan-out testable with in-memory fakes.

use anyhow::{Context, Result, bail};
use catalog::{Video, parse_channel_videos};
use std::future::Future;
use std::path::PathBuf;
use tracing::debug;

/// Fetches a channel's recent videos, newest first.
pub trait ChannelVideoSource: Send + Sync + 'static {
    fn channel_videos(&self, channel_id: &str) -> impl Future<Output = Result<Vec<Video>>> + Send;
}

/// Reads channel listings from `<dir>/<channel_id>.json`.
///
/// Files hold either a bare array of videos or an object with a `videos`
/// array, the two shapes the provider's channel endpoint returns.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, channel_id: &str) -> Result<PathBuf> {
        if channel_id.is_empty()
            || channel_id.contains(['/', '\\'])
            || channel_id.starts_with('.')
        {
            bail!("Invalid channel id: {:?}", channel_id);
        }
        Ok(self.dir.join(format!("{}.json", channel_id)))
    }
}

impl ChannelVideoSource for FixtureSource {
    async fn channel_videos(&self, channel_id: &str) -> Result<Vec<Video>> {
        let path = self.path_for(channel_id)?;
        let json = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let videos = parse_channel_videos(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        debug!("Loaded {} videos for channel {}", videos.len(), channel_id);
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_reads_both_payload_shapes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("UC1.json"),
            r#"[{"videoId": "a", "title": "Bare"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("UC2.json"),
            r#"{"videos": [{"videoId": "b", "title": "Wrapped"}, {"videoId": "c"}]}"#,
        )
        .unwrap();

        let source = FixtureSource::new(dir.path());
        let bare = source.channel_videos("UC1").await.unwrap();
        assert_eq!(bare.len(), 1);
        assert_eq!(bare[0].title, "Bare");

        let wrapped = source.channel_videos("UC2").await.unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[1].video_id, "c");
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("UCbad.json"), "not json").unwrap();
        fs::write(dir.path().join("UCerr.json"), r#"{"error": "channel terminated"}"#).unwrap();

        let source = FixtureSource::new(dir.path());
        assert!(source.channel_videos("UCmissing").await.is_err());
        assert!(source.channel_videos("UCbad").await.is_err());
        assert!(source.channel_videos("UCerr").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let source = FixtureSource::new("/tmp");
        for id in ["", "../etc/passwd", "a/b", ".hidden"] {
            assert!(source.channel_videos(id).await.is_err(), "{:?}", id);
        }
    }
}
