use poise::serenity_prelude as serenity;
use serenity::{ActivityData, ChannelId, FullEvent, GuildId, OnlineStatus, UserId, VoiceState};
use tracing::{debug, info};

use crate::{Data, Error};

/// Gateway events the music side cares about.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot } => {
            info!(
                "{} is connected to {} guild(s)",
                data_about_bot.user.name,
                data_about_bot.guilds.len()
            );

            let prefix = framework
                .options()
                .prefix_options
                .prefix
                .as_deref()
                .unwrap_or(crate::config::DEFAULT_PREFIX);
            ctx.set_presence(
                Some(ActivityData::listening(format!("{}play", prefix))),
                OnlineStatus::Idle,
            );
        }
        FullEvent::VoiceStateUpdate { old, new } => {
            voice_state_update(ctx, data, old.as_ref(), new).await;
        }
        _ => {}
    }
    Ok(())
}

async fn voice_state_update(
    ctx: &serenity::Context,
    data: &Data,
    old: Option<&VoiceState>,
    new: &VoiceState,
) {
    let Some(guild_id) = new.guild_id else {
        return;
    };
    let bot_id = ctx.cache.current_user().id;

    if new.user_id == bot_id {
        if new.channel_id.is_none() && data.players.contains(guild_id) {
            info!("Bot was disconnected from voice in guild {}", guild_id);
            data.players.teardown(guild_id).await;
        }
        return;
    }

    // Only someone leaving the bot's channel can leave it without listeners.
    let left = old.and_then(|old| old.channel_id);
    if left.is_none() || left == new.channel_id {
        return;
    }

    let Some((bot_channel, humans)) = listeners(ctx, guild_id, bot_id) else {
        return;
    };
    if left != Some(bot_channel) {
        return;
    }

    debug!("{} listener(s) left in {}", humans, bot_channel);
    data.players.on_voice_membership(guild_id, humans).await;
}

/// The bot's voice channel in a guild and how many non-bot members share it.
fn listeners(ctx: &serenity::Context, guild_id: GuildId, bot_id: UserId) -> Option<(ChannelId, usize)> {
    let guild = ctx.cache.guild(guild_id)?;
    let bot_channel = guild.voice_states.get(&bot_id)?.channel_id?;

    let is_bot = |state: &VoiceState| {
        state
            .member
            .as_ref()
            .map(|member| member.user.bot)
            .or_else(|| guild.members.get(&state.user_id).map(|member| member.user.bot))
            .unwrap_or(false)
    };

    let humans = count_humans(
        guild
            .voice_states
            .values()
            .map(|state| (state.channel_id, is_bot(state))),
        bot_channel,
    );

    Some((bot_channel, humans))
}

/// Count the non-bot members in `channel`, given each voice member's channel and
/// whether they are a bot.
fn count_humans(
    members: impl IntoIterator<Item = (Option<ChannelId>, bool)>,
    channel: ChannelId,
) -> usize {
    members
        .into_iter()
        .filter(|(joined, bot)| *joined == Some(channel) && !bot)
        .count()
}
