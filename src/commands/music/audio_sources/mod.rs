//! This module defines the track-lookup side of the bot: how raw user input is
//! classified, what a lookup returns, and the `TrackLoader` interface the command
//! layer resolves queries through.

/// Submodule defining `Track` and the `yt-dlp` JSON it is built from.
pub mod track_metadata;
/// Submodule implementing `TrackLoader` on top of the `yt-dlp` command-line tool.
pub mod youtube;

use crate::commands::music::utils::errors::MusicResult;
use regex::Regex;
use serenity::async_trait;
use std::sync::LazyLock;
use url::Url;

pub use track_metadata::Track;

/// Matches input that looks like a link: a scheme, a `www` host or a bare `domain.tld/` prefix.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^\b((?:https?://|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’]))"#,
    )
    .unwrap()
});

/// A user query, classified once so loaders never have to guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Something URL-shaped, passed to the loader verbatim.
    Url(String),
    /// Free text to be searched for.
    Search(String),
}

impl Query {
    /// Strips the `<...>` Discord uses to suppress embeds and classifies the rest.
    pub fn parse(raw: &str) -> Self {
        let query = raw.trim().trim_start_matches('<').trim_end_matches('>').trim();

        if URL_REGEX.is_match(query) {
            Query::Url(query.to_string())
        } else {
            Query::Search(query.to_string())
        }
    }

    pub fn is_playlist(&self) -> bool {
        match self {
            Query::Url(url) => is_playlist_url(url),
            Query::Search(_) => false,
        }
    }
}

/// A playlist link either has a `list` parameter or points at a `/playlist` page.
fn is_playlist_url(url: &str) -> bool {
    let parsed = Url::parse(url).or_else(|_| Url::parse(&format!("https://{}", url)));

    match parsed {
        Ok(url) => {
            url.path().starts_with("/playlist") || url.query_pairs().any(|(key, _)| key == "list")
        }
        Err(_) => false,
    }
}

/// What a lookup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    /// Every track of a playlist; all of them are queued.
    Playlist { name: String, tracks: Vec<Track> },
    /// Zero or more independent hits; more than one means the user has to pick.
    Tracks(Vec<Track>),
}

impl LoadResult {
    pub fn is_empty(&self) -> bool {
        match self {
            LoadResult::Playlist { tracks, .. } | LoadResult::Tracks(tracks) => tracks.is_empty(),
        }
    }
}

/// Resolves queries into playable tracks.
#[async_trait]
pub trait TrackLoader: Send + Sync {
    /// Looks the query up. An empty result is not an error at this level.
    async fn load(&self, query: &Query) -> MusicResult<LoadResult>;
}
