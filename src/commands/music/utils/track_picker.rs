use poise::{CreateReply, serenity_prelude as serenity};
use serenity::ReactionType;
use ::serenity::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::embedded_messages;
use super::errors::{MusicError, MusicResult};
use crate::Context;
use crate::commands::music::audio_sources::{LoadResult, Track};

/// Number of search results offered for picking.
pub const PICKER_OPTIONS: usize = 5;

/// How long the author has to pick a track.
pub const PICKER_TIMEOUT: Duration = Duration::from_secs(60);

/// Keycap emojis used as picker options, in order.
pub const OPTION_EMOJIS: [&str; PICKER_OPTIONS] = [
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
];

/// Map a reaction back to its option index. Clients disagree on the variation selector,
/// so it is ignored.
pub fn option_index(emoji: &str) -> Option<usize> {
    let emoji = emoji.replace('\u{fe0f}', "");
    OPTION_EMOJIS
        .iter()
        .position(|option| option.replace('\u{fe0f}', "") == emoji)
}

/// The chat side the music commands talk to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Post an informational message.
    async fn send(&self, text: String) -> MusicResult<()>;

    /// Offer numbered options and wait for the author to pick one.
    /// `None` means nobody picked in time.
    async fn choose(&self, options: Vec<String>, timeout: Duration) -> MusicResult<Option<usize>>;
}

/// What a lookup turned into once the author had their say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Playlist { name: String, tracks: Vec<Track> },
    Single(Track),
    Picked(Track),
    Cancelled,
}

impl Selection {
    /// Turn a lookup result into tracks to queue, prompting the author when the lookup
    /// was ambiguous.
    pub async fn resolve(messenger: &dyn Messenger, result: LoadResult) -> MusicResult<Self> {
        if result.is_empty() {
            return Err(MusicError::NoTracksFound);
        }

        let mut tracks = match result {
            LoadResult::Playlist { name, tracks } => {
                return Ok(Selection::Playlist { name, tracks });
            }
            LoadResult::Tracks(tracks) => tracks,
        };

        if tracks.len() == 1 {
            return Ok(Selection::Single(tracks.remove(0)));
        }

        tracks.truncate(PICKER_OPTIONS);
        let options = tracks
            .iter()
            .enumerate()
            .map(|(i, track)| track.picker_line(i + 1))
            .collect();

        match messenger.choose(options, PICKER_TIMEOUT).await? {
            Some(index) if index < tracks.len() => Ok(Selection::Picked(tracks.swap_remove(index))),
            Some(index) => {
                warn!("Picker returned out of range option {}", index);
                Ok(Selection::Cancelled)
            }
            None => {
                debug!("Track picker timed out");
                Ok(Selection::Cancelled)
            }
        }
    }
}

/// `Messenger` over the context of the command being handled.
pub struct ChatMessenger<'a> {
    ctx: Context<'a>,
}

impl<'a> ChatMessenger<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }

    /// Prefix invocations leave the author's message behind; clean it up after a timeout.
    async fn delete_invocation(&self) {
        if let poise::Context::Prefix(prefix) = self.ctx {
            if let Err(e) = prefix.msg.delete(self.ctx).await {
                debug!("Could not delete invoking message: {}", e);
            }
        }
    }
}

#[async_trait]
impl Messenger for ChatMessenger<'_> {
    async fn send(&self, text: String) -> MusicResult<()> {
        self.ctx
            .send(CreateReply::default().embed(embedded_messages::information(
                &text,
                &self.ctx.author().name,
            )))
            .await?;
        Ok(())
    }

    async fn choose(&self, options: Vec<String>, timeout: Duration) -> MusicResult<Option<usize>> {
        let count = options.len().min(PICKER_OPTIONS);
        let handle = self
            .ctx
            .send(CreateReply::default().embed(embedded_messages::track_choice(
                &options,
                &self.ctx.author().name,
            )))
            .await?;
        let prompt = handle.message().await?.into_owned();

        for emoji in OPTION_EMOJIS.iter().take(count) {
            prompt
                .react(self.ctx, ReactionType::Unicode(emoji.to_string()))
                .await?;
        }

        let reaction = prompt
            .await_reaction(self.ctx.serenity_context())
            .author_id(self.ctx.author().id)
            .timeout(timeout)
            .filter(move |reaction| match &reaction.emoji {
                ReactionType::Unicode(emoji) => option_index(emoji).is_some_and(|i| i < count),
                _ => false,
            })
            .await;

        if let Err(e) = prompt.delete(self.ctx).await {
            debug!("Could not delete track picker: {}", e);
        }

        let choice = reaction.and_then(|reaction| match &reaction.emoji {
            ReactionType::Unicode(emoji) => option_index(emoji),
            _ => None,
        });

        match choice {
            Some(index) => info!("{} picked option {}", self.ctx.author().name, index + 1),
            None => self.delete_invocation().await,
        }
        Ok(choice)
    }
}
