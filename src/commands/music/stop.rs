use super::*;

/// Stop playback and clear the queue
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("reset")
)]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    respond(ctx, stop_player(ctx).await).await
}

async fn stop_player(ctx: Context<'_>) -> MusicResult<String> {
    let player = player(ctx)?;
    player.lock().await.stop().await?;
    Ok("Bot Stopped!".to_string())
}
