//! Implements the `TrackLoader` trait using the `yt-dlp` command-line tool.

use serenity::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::track_metadata::{YtDlpEntry, YtDlpPlaylist};
use super::{LoadResult, Query, TrackLoader};
use crate::commands::music::utils::errors::{MusicError, MusicResult};

/// How many hits a free-text search offers to the track picker.
pub const SEARCH_RESULTS: usize = 5;

/// Loads tracks by shelling out to `yt-dlp`.
pub struct YtDlpLoader {
    program: String,
}

impl YtDlpLoader {
    /// Creates a loader that runs the given `yt-dlp` executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `yt-dlp` and returns its stdout. A failed run with no output is treated as
    /// "nothing found" so an unknown link surfaces as `NoTracksFound` instead of an error.
    async fn run(&self, args: &[&str]) -> MusicResult<String> {
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| MusicError::AudioSource(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            warn!(
                "yt-dlp exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TrackLoader for YtDlpLoader {
    async fn load(&self, query: &Query) -> MusicResult<LoadResult> {
        let result = match query {
            Query::Url(url) if query.is_playlist() => {
                info!("Loading playlist from URL: {}", url);
                let output = self.run(&["-J", "--flat-playlist", url]).await?;
                parse_playlist(&output)?
            }
            Query::Url(url) => {
                info!("Loading track from URL: {}", url);
                let output = self.run(&["-j", "--no-playlist", url]).await?;
                LoadResult::Tracks(parse_entries(&output))
            }
            Query::Search(terms) => {
                info!("Searching for: {}", terms);
                let search = format!("ytsearch{}:{}", SEARCH_RESULTS, terms);
                let output = self.run(&["-j", "--flat-playlist", &search]).await?;
                LoadResult::Tracks(parse_entries(&output))
            }
        };

        Ok(result)
    }
}

/// Parses `-j` output: one JSON object per line. Unparseable or unplayable lines are skipped.
pub fn parse_entries(output: &str) -> Vec<super::Track> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<YtDlpEntry>(line) {
            Ok(entry) => entry.into_track(),
            Err(e) => {
                warn!("Skipping unparseable yt-dlp line: {}", e);
                None
            }
        })
        .collect()
}

/// Parses `-J --flat-playlist` output: a single playlist object.
pub fn parse_playlist(output: &str) -> MusicResult<LoadResult> {
    if output.trim().is_empty() {
        return Ok(LoadResult::Tracks(Vec::new()));
    }

    let playlist: YtDlpPlaylist = serde_json::from_str(output)
        .map_err(|e| MusicError::AudioSource(format!("Failed to parse playlist: {}", e)))?;

    Ok(LoadResult::Playlist {
        name: playlist
            .title
            .unwrap_or_else(|| "Untitled playlist".to_string()),
        tracks: playlist
            .entries
            .into_iter()
            .filter_map(YtDlpEntry::into_track)
            .collect(),
    })
}
