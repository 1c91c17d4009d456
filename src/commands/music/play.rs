use super::*;
use crate::commands::music::audio_sources::Query;
use crate::commands::music::utils::{
    guild_player,
    track_picker::{ChatMessenger, Selection},
    user_voice_channel,
};
use tracing::{debug, info};

/// Play a song from a URL or a search, or resume playback when no query is given
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Music",
    aliases("p")
)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"]
    #[rest]
    query: Option<String>,
) -> CommandResult {
    match query.filter(|query| !query.trim().is_empty()) {
        Some(query) => report_failure(ctx, enqueue(ctx, &query).await).await,
        None => respond(ctx, resume(ctx).await).await,
    }
}

/// Connect to the author's channel unless the player already is connected.
async fn ensure_connected(ctx: Context<'_>, player: &SharedPlayer) -> MusicResult<()> {
    let mut player = player.lock().await;
    if player.is_connected() {
        return Ok(());
    }

    let guild_id = player.guild_id();
    let author_channel = user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id);
    player.connect(author_channel, None).await?;
    Ok(())
}

async fn resume(ctx: Context<'_>) -> MusicResult<String> {
    let player = player(ctx)?;
    ensure_connected(ctx, &player).await?;

    player.lock().await.resume().await?;
    Ok("Song Resumed!".to_string())
}

async fn enqueue(ctx: Context<'_>, raw: &str) -> MusicResult<()> {
    let player = player(ctx)?;
    ensure_connected(ctx, &player).await?;

    // Lookups can outlast the interaction deadline.
    ctx.defer().await?;

    let query = Query::parse(raw);
    info!("{} requested {:?}", ctx.author().name, query);
    let result = ctx.data().loader.load(&query).await?;

    // The picker may wait a full minute, so it runs before the player is locked.
    let messenger = ChatMessenger::new(ctx);
    let selection = Selection::resolve(&messenger, result).await?;
    debug!("Resolved selection: {:?}", selection);

    guild_player::enqueue(&player, &messenger, selection).await
}
