use super::*;

/// Show the song that is playing and how far along it is
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("np")
)]
pub async fn playing(ctx: Context<'_>) -> CommandResult {
    respond_embed(ctx, describe(ctx).await).await
}

async fn describe(ctx: Context<'_>) -> MusicResult<CreateEmbed> {
    let player = player(ctx)?;
    let now = player.lock().await.now_playing().await?;
    Ok(embedded_messages::now_playing(&now, &ctx.author().name))
}
