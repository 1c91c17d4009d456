use super::*;
use crate::commands::music::utils::user_voice_channel;
use tracing::info;

/// Join your voice channel, or the one given
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("join", "con")
)]
pub async fn connect(
    ctx: Context<'_>,
    #[description = "Voice channel to join instead of yours"]
    #[channel_types("Voice")]
    channel: Option<GuildChannel>,
) -> CommandResult {
    respond(ctx, join(ctx, channel.map(|channel| channel.id)).await).await
}

async fn join(ctx: Context<'_>, requested: Option<ChannelId>) -> MusicResult<String> {
    let guild_id = guild_id(ctx)?;
    let author_channel = user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id);

    let player = player(ctx)?;
    let channel_id = player
        .lock()
        .await
        .connect(author_channel, requested)
        .await?;

    info!("{} connected the bot to {}", ctx.author().name, channel_id);
    Ok(format!("Connected to <#{}>!", channel_id))
}
