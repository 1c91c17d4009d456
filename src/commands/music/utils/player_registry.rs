use dashmap::DashMap;
use futures::future::join_all;
use poise::serenity_prelude as serenity;
use serenity::GuildId;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::guild_player::GuildPlayer;
use super::playback_node::NodeFactory;

/// A guild player behind its own lock; every command and event for the guild goes through it.
pub type SharedPlayer = Arc<Mutex<GuildPlayer>>;

/// Process-wide map of guild players, created on first access.
pub struct PlayerRegistry {
    players: DashMap<GuildId, SharedPlayer>,
    factory: Arc<dyn NodeFactory>,
}

impl PlayerRegistry {
    pub fn new(factory: Arc<dyn NodeFactory>) -> Self {
        Self {
            players: DashMap::new(),
            factory,
        }
    }

    /// Get the player for a guild, creating it if this is the first access
    pub fn get(&self, guild_id: GuildId) -> SharedPlayer {
        self.players
            .entry(guild_id)
            .or_insert_with(|| {
                info!("Creating player for guild {}", guild_id);
                Arc::new(Mutex::new(GuildPlayer::new(
                    guild_id,
                    self.factory.create(guild_id),
                )))
            })
            .clone()
    }

    /// Get the player for a guild without creating one
    pub fn existing(&self, guild_id: GuildId) -> Option<SharedPlayer> {
        self.players.get(&guild_id).map(|player| player.clone())
    }

    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.players.contains_key(&guild_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Remove a guild's player and tear its connection down. Returns false if there was none.
    pub async fn teardown(&self, guild_id: GuildId) -> bool {
        // Removed before locking so no new command can reach the dying player.
        let Some((_, player)) = self.players.remove(&guild_id) else {
            return false;
        };

        player.lock().await.teardown().await;
        info!("Removed player for guild {}", guild_id);
        true
    }

    /// React to a voice membership change: `humans` is the number of non-bot members left
    /// in the bot's channel. An empty channel tears the guild down.
    pub async fn on_voice_membership(&self, guild_id: GuildId, humans: usize) -> bool {
        if humans > 0 || !self.contains(guild_id) {
            return false;
        }

        info!("Voice channel in guild {} is empty, leaving", guild_id);
        self.teardown(guild_id).await
    }

    /// Tear every player down, e.g. on shutdown.
    pub async fn shutdown(&self) {
        let guilds: Vec<GuildId> = self.players.iter().map(|entry| *entry.key()).collect();
        info!("Tearing down {} player(s)", guilds.len());

        join_all(guilds.into_iter().map(|guild_id| self.teardown(guild_id))).await;
    }
}
