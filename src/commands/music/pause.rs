use super::*;

/// Pause the current track; `play` without a query resumes it
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("pa")
)]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    respond(ctx, pause_player(ctx).await).await
}

async fn pause_player(ctx: Context<'_>) -> MusicResult<String> {
    let player = player(ctx)?;
    player.lock().await.pause().await?;
    Ok("Song Paused!".to_string())
}
