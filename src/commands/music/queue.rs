use super::*;

/// Show the current song and what comes next
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("q")
)]
pub async fn queue(
    ctx: Context<'_>,
    #[description = "How many upcoming songs to list (default 10)"] show: Option<usize>,
) -> CommandResult {
    respond_embed(ctx, list(ctx, show.unwrap_or(10)).await).await
}

async fn list(ctx: Context<'_>, show: usize) -> MusicResult<CreateEmbed> {
    let player = player(ctx)?;
    let player = player.lock().await;

    if player.queue().is_empty() {
        return Err(MusicError::QueueEmpty);
    }
    Ok(embedded_messages::queue_list(
        player.queue(),
        show,
        &ctx.author().name,
    ))
}
