use super::*;
use crate::commands::music::utils::queue::RepeatMode;

/// Set the repeat mode: `none`, `1` (current song) or `all` (whole queue)
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn repeat(
    ctx: Context<'_>,
    #[description = "none, 1 or all"] mode: String,
) -> CommandResult {
    respond(ctx, set_repeat(ctx, &mode).await).await
}

async fn set_repeat(ctx: Context<'_>, mode: &str) -> MusicResult<String> {
    let mode: RepeatMode = mode.trim().to_lowercase().parse()?;

    let player = player(ctx)?;
    player.lock().await.set_repeat(mode);
    Ok(format!("The playlist set to repeat {}", mode))
}
