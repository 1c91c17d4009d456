use super::*;
use tracing::info;

/// Remove a song from the queue by its number
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("rem")
)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Number of the song, as listed by the queue command"] index: usize,
) -> CommandResult {
    respond(ctx, remove_track(ctx, index).await).await
}

async fn remove_track(ctx: Context<'_>, index: usize) -> MusicResult<String> {
    let player = player(ctx)?;
    let removed = player.lock().await.remove(index).await?;

    info!("{} removed '{}' from the queue", ctx.author().name, removed.title);
    Ok(format!("Removed `{}` from the queue!", removed.title))
}
