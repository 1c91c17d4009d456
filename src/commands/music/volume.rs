use super::*;
use crate::commands::music::utils::guild_player::GuildPlayer;

/// Set the playback volume in percent (0 to 150)
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    subcommands("set", "up", "down")
)]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "New volume in percent"] volume: Option<i64>,
) -> CommandResult {
    match volume {
        Some(volume) => respond(ctx, change(ctx, Change::Set(volume)).await).await,
        None => respond(ctx, current(ctx).await).await,
    }
}

/// Set the playback volume in percent (0 to 150)
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn set(
    ctx: Context<'_>,
    #[description = "New volume in percent"] volume: i64,
) -> CommandResult {
    respond(ctx, change(ctx, Change::Set(volume)).await).await
}

/// Turn the volume up by 10%
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn up(ctx: Context<'_>) -> CommandResult {
    respond(ctx, change(ctx, Change::Up).await).await
}

/// Turn the volume down by 10%
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn down(ctx: Context<'_>) -> CommandResult {
    respond(ctx, change(ctx, Change::Down).await).await
}

enum Change {
    Set(i64),
    Up,
    Down,
}

async fn apply(player: &mut GuildPlayer, change: Change) -> MusicResult<u16> {
    match change {
        Change::Set(volume) => player.set_volume(volume).await,
        Change::Up => player.volume_up().await,
        Change::Down => player.volume_down().await,
    }
}

async fn change(ctx: Context<'_>, change: Change) -> MusicResult<String> {
    let player = player(ctx)?;
    let volume = apply(&mut *player.lock().await, change).await?;
    Ok(format!("Volume set to {}%", volume))
}

async fn current(ctx: Context<'_>) -> MusicResult<String> {
    let player = player(ctx)?;
    let volume = player.lock().await.volume();
    Ok(format!("Volume is {}%", volume))
}
