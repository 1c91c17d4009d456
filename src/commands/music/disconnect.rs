use super::*;

/// Leave the voice channel and drop the queue
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("leave", "lv", "dc")
)]
pub async fn disconnect(ctx: Context<'_>) -> CommandResult {
    respond(ctx, leave(ctx).await).await
}

async fn leave(ctx: Context<'_>) -> MusicResult<String> {
    let guild_id = guild_id(ctx)?;

    if !ctx.data().players.teardown(guild_id).await {
        return Err(MusicError::NotConnected);
    }
    Ok("The bot is disconnected!!".to_string())
}
