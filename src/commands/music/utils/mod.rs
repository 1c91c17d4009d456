use poise::serenity_prelude as serenity;
use serenity::{ChannelId, GuildId, UserId};
use std::time::Duration;

// Export music utilities
pub mod embedded_messages;
pub mod errors;
pub mod event_handlers;
pub mod guild_player;
pub mod playback_node;
pub mod player_registry;
pub mod queue;
pub mod track_picker;

/// Format a duration into a human-readable string (e.g., "3:45" or "1:23:45")
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Get the voice channel a user is currently sitting in, if any.
pub fn user_voice_channel(
    ctx: &serenity::Context,
    guild_id: GuildId,
    user_id: UserId,
) -> Option<ChannelId> {
    let guild = ctx.cache.guild(guild_id)?;
    guild.voice_states.get(&user_id)?.channel_id
}
