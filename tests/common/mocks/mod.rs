//! Fakes and mocks for the collaborators the music core talks to

use async_trait::async_trait;
use jukebox::commands::music::audio_sources::Track;
use jukebox::commands::music::utils::errors::{MusicError, MusicResult};
use jukebox::commands::music::utils::playback_node::{
    DEFAULT_VOLUME, NodeFactory, PlaybackNode,
};
use jukebox::commands::music::utils::track_picker::Messenger;
use mockall::mock;
use poise::serenity_prelude::{ChannelId, GuildId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Everything a `FakeNode` was asked to do
#[derive(Debug)]
pub struct NodeState {
    pub channel: Option<ChannelId>,
    pub loaded: Option<Track>,
    pub paused: bool,
    pub volume: u16,
    pub played: Vec<String>,
    pub stops: usize,
    pub destroyed: usize,
    /// Tracks started so far; each one's number is its generation.
    pub started: u64,
    /// Generation of the loaded track, 0 once destroyed.
    pub live: u64,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            channel: None,
            loaded: None,
            paused: false,
            volume: DEFAULT_VOLUME,
            played: Vec::new(),
            stops: 0,
            destroyed: 0,
            started: 0,
            live: 0,
        }
    }
}

/// In-memory playback node. Clones share state, so a test can keep one and hand the
/// other to the player.
#[derive(Clone, Default)]
pub struct FakeNode {
    state: Arc<Mutex<NodeState>>,
}

impl FakeNode {
    pub fn played(&self) -> Vec<String> {
        self.state.lock().unwrap().played.clone()
    }

    pub fn loaded(&self) -> Option<String> {
        self.state.lock().unwrap().loaded.as_ref().map(|t| t.title.clone())
    }

    pub fn stops(&self) -> usize {
        self.state.lock().unwrap().stops
    }

    pub fn destroyed(&self) -> usize {
        self.state.lock().unwrap().destroyed
    }

    /// Generation an event from the current track would carry
    pub fn live_generation(&self) -> u64 {
        self.state.lock().unwrap().live
    }

    /// Simulate the track running out on its own
    pub fn finish_track(&self) {
        self.state.lock().unwrap().loaded = None;
    }
}

#[async_trait]
impl PlaybackNode for FakeNode {
    async fn connect(&mut self, channel_id: ChannelId) -> MusicResult<()> {
        self.state.lock().unwrap().channel = Some(channel_id);
        Ok(())
    }

    async fn play(&mut self, track: &Track) -> MusicResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.channel.is_none() {
            return Err(MusicError::NotConnected);
        }
        state.played.push(track.title.clone());
        state.loaded = Some(track.clone());
        state.paused = false;
        state.started += 1;
        state.live = state.started;
        Ok(())
    }

    async fn stop(&mut self) -> MusicResult<()> {
        let mut state = self.state.lock().unwrap();
        state.loaded = None;
        state.paused = false;
        state.stops += 1;
        Ok(())
    }

    async fn set_pause(&mut self, pause: bool) -> MusicResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.loaded.is_some() {
            state.paused = pause;
        }
        Ok(())
    }

    async fn set_volume(&mut self, volume: u16) -> MusicResult<()> {
        self.state.lock().unwrap().volume = volume;
        Ok(())
    }

    async fn destroy(&mut self) -> MusicResult<()> {
        let mut state = self.state.lock().unwrap();
        state.channel = None;
        state.loaded = None;
        state.live = 0;
        state.destroyed += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().channel.is_some()
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().loaded.is_some()
    }

    fn is_paused(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.paused && state.loaded.is_some()
    }

    fn volume(&self) -> u16 {
        self.state.lock().unwrap().volume
    }

    async fn position(&self) -> Duration {
        Duration::from_secs(12)
    }

    fn owns(&self, generation: u64) -> bool {
        self.state.lock().unwrap().live == generation
    }
}

/// Hands out `FakeNode`s and remembers them per guild
#[derive(Default)]
pub struct FakeNodeFactory {
    nodes: Mutex<HashMap<GuildId, FakeNode>>,
}

impl FakeNodeFactory {
    pub fn node(&self, guild_id: GuildId) -> FakeNode {
        self.nodes
            .lock()
            .unwrap()
            .get(&guild_id)
            .cloned()
            .expect("no node was created for this guild")
    }

    pub fn created(&self) -> usize {
        self.nodes.lock().unwrap().len()
    }
}

impl NodeFactory for FakeNodeFactory {
    fn create(&self, guild_id: GuildId) -> Box<dyn PlaybackNode> {
        let node = FakeNode::default();
        self.nodes.lock().unwrap().insert(guild_id, node.clone());
        Box::new(node)
    }
}

mock! {
    pub Messenger {}

    #[async_trait]
    impl Messenger for Messenger {
        async fn send(&self, text: String) -> MusicResult<()>;
        async fn choose(&self, options: Vec<String>, timeout: Duration) -> MusicResult<Option<usize>>;
    }
}

/// A messenger that accepts any confirmation and never gets a pick
pub fn quiet_messenger() -> MockMessenger {
    let mut messenger = MockMessenger::new();
    messenger.expect_send().returning(|_| Ok(()));
    messenger.expect_choose().returning(|_, _| Ok(None));
    messenger
}
