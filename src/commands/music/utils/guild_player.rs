use poise::serenity_prelude as serenity;
use serenity::{ChannelId, GuildId};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::errors::{MusicError, MusicResult};
use super::playback_node::{MAX_VOLUME, PlaybackNode};
use super::player_registry::SharedPlayer;
use super::queue::{Queue, RepeatMode};
use super::track_picker::{Messenger, Selection};
use crate::commands::music::audio_sources::Track;

/// Volume change applied by `volume up` / `volume down`.
pub const VOLUME_STEP: u16 = 10;

/// Where a guild player is, as seen through its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Disconnected,
    Idle,
    Playing,
    Paused,
}

/// What `now_playing` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub track: Track,
    pub position: Duration,
}

/// One guild's queue plus the playback node that plays it.
pub struct GuildPlayer {
    guild_id: GuildId,
    queue: Queue,
    node: Box<dyn PlaybackNode>,
    channel_id: Option<ChannelId>,
}

impl GuildPlayer {
    pub fn new(guild_id: GuildId, node: Box<dyn PlaybackNode>) -> Self {
        Self {
            guild_id,
            queue: Queue::new(),
            node,
            channel_id: None,
        }
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn channel_id(&self) -> Option<ChannelId> {
        self.channel_id
    }

    pub fn volume(&self) -> u16 {
        self.node.volume()
    }

    pub fn is_connected(&self) -> bool {
        self.node.is_connected()
    }

    /// Whether an event from the track started with `generation` still concerns this player.
    pub fn owns(&self, generation: u64) -> bool {
        self.node.owns(generation)
    }

    pub fn state(&self) -> PlayerState {
        if !self.node.is_connected() {
            PlayerState::Disconnected
        } else if self.node.is_paused() {
            PlayerState::Paused
        } else if self.node.is_playing() {
            PlayerState::Playing
        } else {
            PlayerState::Idle
        }
    }

    /// Join a voice channel. An explicit `requested` channel wins over the one the
    /// author is sitting in.
    pub async fn connect(
        &mut self,
        author_channel: Option<ChannelId>,
        requested: Option<ChannelId>,
    ) -> MusicResult<ChannelId> {
        if self.node.is_connected() {
            return Err(MusicError::AlreadyConnected);
        }

        let channel_id = requested
            .or(author_channel)
            .ok_or(MusicError::NoVoiceChannel)?;

        self.node.connect(channel_id).await?;
        self.channel_id = Some(channel_id);
        info!("Connected to {} in guild {}", channel_id, self.guild_id);
        Ok(channel_id)
    }

    /// Destroy the node connection. Never fails; errors are logged.
    pub async fn teardown(&mut self) {
        if let Err(e) = self.node.destroy().await {
            warn!("Error tearing down player for guild {}: {}", self.guild_id, e);
        }
        self.channel_id = None;
    }

    /// Queue a resolved selection and start playing if the node is idle.
    ///
    /// Returns the confirmation owed to the author for a single or picked track. Sending it
    /// is left to the caller so it never happens under the player lock.
    pub async fn add_tracks(&mut self, selection: Selection) -> MusicResult<Option<String>> {
        let confirmation = match selection {
            Selection::Playlist { name, tracks } => {
                info!(
                    "Queueing {} tracks from playlist '{}' in guild {}",
                    tracks.len(),
                    name,
                    self.guild_id
                );
                self.queue.add(tracks);
                None
            }
            Selection::Single(track) | Selection::Picked(track) => {
                let confirmation = format!("Added `{}` to the queue!", track.title);
                self.queue.add([track]);
                Some(confirmation)
            }
            Selection::Cancelled => {
                debug!("Track selection cancelled in guild {}", self.guild_id);
                None
            }
        };

        if !self.node.is_playing() && !self.queue.is_empty() {
            self.start_playback().await?;
        }
        Ok(confirmation)
    }

    /// Play the track under the cursor.
    pub async fn start_playback(&mut self) -> MusicResult<()> {
        let track = self.queue.current()?.clone();
        self.node.play(&track).await
    }

    /// Move to the next track and play it. An empty queue is not an error here.
    pub async fn advance(&mut self) -> MusicResult<()> {
        match self.queue.advance() {
            Ok(Some(track)) => {
                let track = track.clone();
                self.node.play(&track).await
            }
            Ok(None) => {
                info!("Queue finished for guild {}", self.guild_id);
                Ok(())
            }
            Err(MusicError::QueueEmpty) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Play the current track again without moving the cursor.
    pub async fn repeat_track(&mut self) -> MusicResult<()> {
        let track = self.queue.current()?.clone();
        debug!("Repeating '{}' in guild {}", track.title, self.guild_id);
        self.node.play(&track).await
    }

    /// Skip to the next track.
    pub async fn skip(&mut self) -> MusicResult<()> {
        if self.queue.upcoming()?.is_empty() {
            return Err(MusicError::NoMoreTracks);
        }
        self.advance().await
    }

    /// Jump to the track at `index` (1-based, as shown in the queue listing) and play it.
    pub async fn skip_to(&mut self, index: usize) -> MusicResult<()> {
        if self.queue.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        if !(1..=self.queue.len()).contains(&index) {
            return Err(MusicError::NoMoreTracks);
        }

        let track = self.queue.jump_to(index - 1)?.clone();
        self.node.play(&track).await
    }

    /// Remove the track at `index` (1-based). Removing the playing track moves playback on.
    pub async fn remove(&mut self, index: usize) -> MusicResult<Track> {
        if !self.node.is_connected() {
            return Err(MusicError::NotConnected);
        }
        if index == 0 {
            return Err(MusicError::NoMoreTracks);
        }

        let was_current = index - 1 == self.queue.position();
        let removed = self.queue.remove_at(index - 1)?;

        if was_current && self.node.is_playing() {
            let paused = self.node.is_paused();
            match self.queue.current() {
                Ok(track) => {
                    let track = track.clone();
                    self.node.play(&track).await?;
                    if paused {
                        self.node.set_pause(true).await?;
                    }
                }
                Err(_) => self.node.stop().await?,
            }
        }
        Ok(removed)
    }

    /// Clear the queue and stop playback.
    pub async fn stop(&mut self) -> MusicResult<()> {
        self.queue.empty();
        self.node.stop().await
    }

    pub async fn pause(&mut self) -> MusicResult<()> {
        if !self.node.is_connected() {
            return Err(MusicError::NotConnected);
        }
        if self.node.is_paused() {
            return Err(MusicError::PlayerAlreadyPaused);
        }
        self.node.set_pause(true).await
    }

    /// Unpause, or restart the current track if nothing is loaded.
    pub async fn resume(&mut self) -> MusicResult<()> {
        if self.queue.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        if self.node.is_playing() {
            self.node.set_pause(false).await
        } else {
            self.start_playback().await
        }
    }

    pub async fn set_volume(&mut self, volume: i64) -> MusicResult<u16> {
        if volume < 0 {
            return Err(MusicError::VolumeTooLow(volume));
        }
        if volume > i64::from(MAX_VOLUME) {
            return Err(MusicError::VolumeTooHigh(volume));
        }

        let volume = volume as u16;
        self.node.set_volume(volume).await?;
        Ok(volume)
    }

    pub async fn volume_up(&mut self) -> MusicResult<u16> {
        let volume = self.node.volume();
        if volume >= MAX_VOLUME {
            return Err(MusicError::MaxVolume);
        }

        let volume = (volume + VOLUME_STEP).min(MAX_VOLUME);
        self.node.set_volume(volume).await?;
        Ok(volume)
    }

    pub async fn volume_down(&mut self) -> MusicResult<u16> {
        let volume = self.node.volume();
        if volume == 0 {
            return Err(MusicError::MinVolume);
        }

        let volume = volume.saturating_sub(VOLUME_STEP);
        self.node.set_volume(volume).await?;
        Ok(volume)
    }

    pub async fn now_playing(&self) -> MusicResult<NowPlaying> {
        if !self.node.is_playing() {
            return Err(MusicError::NothingPlaying);
        }

        Ok(NowPlaying {
            track: self.queue.current()?.clone(),
            position: self.node.position().await,
        })
    }

    pub fn shuffle(&mut self) -> MusicResult<()> {
        self.queue.shuffle()
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        info!("Repeat mode for guild {} set to {}", self.guild_id, mode);
        self.queue.set_repeat(mode);
    }
}

/// Queue `selection` on a shared player and confirm it to the author once the lock is
/// released.
pub async fn enqueue(
    player: &SharedPlayer,
    messenger: &dyn Messenger,
    selection: Selection,
) -> MusicResult<()> {
    let confirmation = player.lock().await.add_tracks(selection).await?;
    if let Some(text) = confirmation {
        messenger.send(text).await?;
    }
    Ok(())
}
