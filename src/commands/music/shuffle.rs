use super::*;

/// Shuffle the songs that have not played yet
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("sh")
)]
pub async fn shuffle(ctx: Context<'_>) -> CommandResult {
    respond(ctx, shuffle_queue(ctx).await).await
}

async fn shuffle_queue(ctx: Context<'_>) -> MusicResult<String> {
    let player = player(ctx)?;
    player.lock().await.shuffle()?;
    Ok("Queue Shuffled!".to_string())
}
