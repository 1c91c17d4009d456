//! jukebox: a Discord music bot built around a per-guild queue and playback state machine.

use std::sync::{Arc, LazyLock};

pub mod commands;
pub mod config;
pub mod events;

use commands::music::audio_sources::TrackLoader;
use commands::music::utils::player_registry::PlayerRegistry;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// HTTP client shared by every songbird input
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub players: Arc<PlayerRegistry>,
    pub loader: Arc<dyn TrackLoader>,
}
