//! The playback-node contract the guild player drives, and its songbird implementation.
//!
//! A node owns one voice connection and at most one loaded track. It reports the end of
//! that track through `NodeEvent`s on a channel consumed by the `PlaybackEventRouter`.

use poise::serenity_prelude as serenity;
use ::serenity::async_trait;
use serenity::{ChannelId, GuildId};
use songbird::input::YoutubeDl;
use songbird::tracks::TrackHandle;
use songbird::{Call, Songbird};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use super::errors::{MusicError, MusicResult};
use super::event_handlers::TrackLifecycleNotifier;
use crate::commands::music::audio_sources::Track;

/// Default and maximum volume, in percent.
pub const DEFAULT_VOLUME: u16 = 100;
pub const MAX_VOLUME: u16 = 150;

/// Why the node let go of its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEventKind {
    /// Finished normally or was stopped.
    TrackEnded,
    /// Started but could not keep decoding.
    TrackStuck,
    /// Could not be opened or parsed.
    TrackException,
}

/// A track-lifecycle notification for one guild's node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeEvent {
    pub guild_id: GuildId,
    /// Generation of the track that produced the event, checked with `PlaybackNode::owns`.
    pub generation: u64,
    pub kind: NodeEventKind,
}

/// Operations the guild player needs from a playback backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaybackNode: Send + Sync {
    /// Opens the voice connection.
    async fn connect(&mut self, channel_id: ChannelId) -> MusicResult<()>;

    /// Replaces whatever is loaded with `track`. The replaced track produces no event.
    async fn play(&mut self, track: &Track) -> MusicResult<()>;

    /// Stops the loaded track. This produces a `TrackEnded` event.
    async fn stop(&mut self) -> MusicResult<()>;

    async fn set_pause(&mut self, pause: bool) -> MusicResult<()>;

    async fn set_volume(&mut self, volume: u16) -> MusicResult<()>;

    /// Closes the voice connection. Destroying an already destroyed node succeeds.
    async fn destroy(&mut self) -> MusicResult<()>;

    fn is_connected(&self) -> bool;

    /// A track is loaded, paused or not.
    fn is_playing(&self) -> bool;

    fn is_paused(&self) -> bool;

    fn volume(&self) -> u16;

    /// Playback position inside the loaded track.
    async fn position(&self) -> Duration;

    /// Whether `generation` belongs to the track this node started last. Events from
    /// any earlier track are stale once they reach the player.
    fn owns(&self, generation: u64) -> bool;
}

/// Creates one node per guild on behalf of the player registry.
pub trait NodeFactory: Send + Sync {
    fn create(&self, guild_id: GuildId) -> Box<dyn PlaybackNode>;
}

/// A playback node backed by a songbird voice call.
pub struct SongbirdNode {
    guild_id: GuildId,
    manager: Arc<Songbird>,
    http: reqwest::Client,
    events: UnboundedSender<NodeEvent>,
    call: Option<Arc<Mutex<Call>>>,
    current: Option<TrackHandle>,
    // Bumped on every play/destroy and by the first event of a track; a track may only
    // report while the counter still holds the value it was started with.
    generation: Arc<AtomicU64>,
    live_generation: u64,
    paused: bool,
    volume: u16,
}

impl SongbirdNode {
    pub fn new(
        guild_id: GuildId,
        manager: Arc<Songbird>,
        http: reqwest::Client,
        events: UnboundedSender<NodeEvent>,
    ) -> Self {
        Self {
            guild_id,
            manager,
            http,
            events,
            call: None,
            current: None,
            generation: Arc::new(AtomicU64::new(0)),
            live_generation: 0,
            paused: false,
            volume: DEFAULT_VOLUME,
        }
    }

    fn live_track(&self) -> Option<&TrackHandle> {
        self.current.as_ref().filter(|_| {
            self.generation.load(Ordering::SeqCst) == self.live_generation
        })
    }

    /// Silences any event the loaded track might still produce.
    fn retire_current(&mut self) -> Option<TrackHandle> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.paused = false;
        self.current.take()
    }
}

#[async_trait]
impl PlaybackNode for SongbirdNode {
    async fn connect(&mut self, channel_id: ChannelId) -> MusicResult<()> {
        info!("Joining voice channel {} in guild {}", channel_id, self.guild_id);
        let call = self.manager.join(self.guild_id, channel_id).await?;
        self.call = Some(call);
        Ok(())
    }

    async fn play(&mut self, track: &Track) -> MusicResult<()> {
        let call = self.call.clone().ok_or(MusicError::NotConnected)?;

        self.retire_current();
        let owner = self.generation.load(Ordering::SeqCst);

        let input = YoutubeDl::new(self.http.clone(), track.uri.clone());
        let handle = {
            let mut call = call.lock().await;
            call.play_only_input(input.into())
        };

        handle.set_volume(f32::from(self.volume) / 100.0)?;

        let notifier =
            TrackLifecycleNotifier::new(self.guild_id, owner, self.generation.clone(), self.events.clone());
        handle.add_event(
            songbird::Event::Track(songbird::TrackEvent::End),
            notifier.clone(),
        )?;
        handle.add_event(songbird::Event::Track(songbird::TrackEvent::Error), notifier)?;

        info!("Playing '{}' in guild {}", track.title, self.guild_id);
        self.current = Some(handle);
        self.live_generation = owner;
        Ok(())
    }

    async fn stop(&mut self) -> MusicResult<()> {
        if let Some(handle) = self.live_track() {
            debug!("Stopping current track in guild {}", self.guild_id);
            handle.stop()?;
        }
        self.current = None;
        self.paused = false;
        Ok(())
    }

    async fn set_pause(&mut self, pause: bool) -> MusicResult<()> {
        if let Some(handle) = self.live_track() {
            if pause {
                handle.pause()?;
            } else {
                handle.play()?;
            }
            self.paused = pause;
        }
        Ok(())
    }

    async fn set_volume(&mut self, volume: u16) -> MusicResult<()> {
        let volume = volume.min(MAX_VOLUME);
        if let Some(handle) = self.live_track() {
            handle.set_volume(f32::from(volume) / 100.0)?;
        }
        self.volume = volume;
        Ok(())
    }

    async fn destroy(&mut self) -> MusicResult<()> {
        self.retire_current();
        // No track is ever started with a retired generation.
        self.live_generation = self.generation.load(Ordering::SeqCst);
        self.call = None;

        match self.manager.remove(self.guild_id).await {
            Ok(()) | Err(songbird::error::JoinError::NoCall) => {
                info!("Left voice in guild {}", self.guild_id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn is_connected(&self) -> bool {
        match &self.call {
            // A locked call is busy with us, so it is still there.
            Some(call) => call
                .try_lock()
                .map(|call| call.current_channel().is_some())
                .unwrap_or(true),
            None => false,
        }
    }

    fn is_playing(&self) -> bool {
        self.live_track().is_some()
    }

    fn is_paused(&self) -> bool {
        self.paused && self.is_playing()
    }

    fn volume(&self) -> u16 {
        self.volume
    }

    async fn position(&self) -> Duration {
        match self.live_track() {
            Some(handle) => handle
                .get_info()
                .await
                .map(|state| state.position)
                .unwrap_or_default(),
            None => Duration::ZERO,
        }
    }

    fn owns(&self, generation: u64) -> bool {
        generation == self.live_generation
    }
}

/// Hands out `SongbirdNode`s that share one songbird manager and one event channel.
pub struct SongbirdNodeFactory {
    manager: Arc<Songbird>,
    http: reqwest::Client,
    events: UnboundedSender<NodeEvent>,
}

impl SongbirdNodeFactory {
    pub fn new(
        manager: Arc<Songbird>,
        http: reqwest::Client,
        events: UnboundedSender<NodeEvent>,
    ) -> Self {
        Self {
            manager,
            http,
            events,
        }
    }
}

impl NodeFactory for SongbirdNodeFactory {
    fn create(&self, guild_id: GuildId) -> Box<dyn PlaybackNode> {
        Box::new(SongbirdNode::new(
            guild_id,
            self.manager.clone(),
            self.http.clone(),
            self.events.clone(),
        ))
    }
}
