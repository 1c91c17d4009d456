use super::*;

/// Skip to the next song in the queue
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("s")
)]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    respond(ctx, skip_track(ctx).await).await
}

/// Jump to a song by its number in the queue
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("goto")
)]
pub async fn skipto(
    ctx: Context<'_>,
    #[description = "Number of the song, as listed by the queue command"] index: usize,
) -> CommandResult {
    respond(ctx, skip_to_track(ctx, index).await).await
}

async fn skip_track(ctx: Context<'_>) -> MusicResult<String> {
    let player = player(ctx)?;
    player.lock().await.skip().await?;
    Ok("Playing next song in queue!".to_string())
}

async fn skip_to_track(ctx: Context<'_>, index: usize) -> MusicResult<String> {
    let player = player(ctx)?;
    player.lock().await.skip_to(index).await?;
    Ok(format!("Playing song {} in queue!", index))
}
