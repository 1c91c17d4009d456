//! Defines `Track`, the immutable handle the queue stores, and its conversion from
//! the JSON that `yt-dlp` prints for videos, search hits and flat playlist entries.

use serde::Deserialize;
use std::time::Duration;

use crate::commands::music::utils::format_duration;

/// A playable item obtained from the lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Address the playback node streams from.
    pub uri: String,
    pub title: String,
    pub author: String,
    pub duration: Duration,
}

impl Track {
    pub fn new(
        uri: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            uri: uri.into(),
            title: title.into(),
            author: author.into(),
            duration,
        }
    }

    /// One numbered line of the track picker, e.g. `**2.** Title (3:07)`.
    pub fn picker_line(&self, number: usize) -> String {
        format!(
            "**{}.** {} ({})",
            number,
            self.title,
            format_duration(self.duration)
        )
    }
}

/// A single object from `yt-dlp -j` / `-J` output.
///
/// Full extractions carry `webpage_url`; flat playlist and search entries only carry `url`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct YtDlpEntry {
    pub title: Option<String>,
    pub webpage_url: Option<String>,
    pub url: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub duration: Option<f64>,
}

/// Top-level object of `yt-dlp -J --flat-playlist`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct YtDlpPlaylist {
    pub title: Option<String>,
    pub entries: Vec<YtDlpEntry>,
}

impl YtDlpEntry {
    /// Converts the entry into a `Track`; entries without any address are unplayable.
    pub fn into_track(self) -> Option<Track> {
        let uri = self.webpage_url.or(self.url)?;
        let duration = self
            .duration
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or_default();

        Some(Track {
            uri,
            title: self.title.unwrap_or_else(|| "Unknown Title".to_string()),
            author: self
                .uploader
                .or(self.channel)
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            duration,
        })
    }
}
