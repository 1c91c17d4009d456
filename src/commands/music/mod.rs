pub mod connect;
pub mod disconnect;
pub mod now_playing;
pub mod pause;
pub mod play;
pub mod queue;
pub mod remove;
pub mod repeat;
pub mod shuffle;
pub mod skip;
pub mod stop;
pub mod volume;

pub mod audio_sources;
pub mod utils;

use poise::CreateReply;
use poise::serenity_prelude::{ChannelId, CreateEmbed, GuildChannel, GuildId};

use crate::{CommandResult, Context};
use utils::embedded_messages;
use utils::errors::{MusicError, MusicResult};
use utils::player_registry::SharedPlayer;

/// Every music command, in the order they are registered.
pub fn commands() -> Vec<poise::Command<crate::Data, crate::Error>> {
    vec![
        connect::connect(),
        disconnect::disconnect(),
        play::play(),
        pause::pause(),
        stop::stop(),
        skip::skip(),
        skip::skipto(),
        shuffle::shuffle(),
        repeat::repeat(),
        queue::queue(),
        volume::volume(),
        now_playing::playing(),
        remove::remove(),
    ]
}

fn guild_id(ctx: Context<'_>) -> MusicResult<GuildId> {
    ctx.guild_id().ok_or(MusicError::NotInGuild)
}

/// The invoking guild's player, created if needed
fn player(ctx: Context<'_>) -> MusicResult<SharedPlayer> {
    Ok(ctx.data().players.get(guild_id(ctx)?))
}

/// Send the outcome of a command. Errors the author can act on become a failure embed;
/// anything else goes to the framework's error handler.
async fn respond_embed(ctx: Context<'_>, result: MusicResult<CreateEmbed>) -> CommandResult {
    let reply = match result {
        Ok(embed) => CreateReply::default().embed(embed),
        Err(err) => embedded_messages::music_error(&err, &ctx.author().name).ok_or(err)?,
    };

    ctx.send(reply).await?;
    Ok(())
}

/// Like `respond_embed`, with the success case as a plain information message.
async fn respond(ctx: Context<'_>, result: MusicResult<String>) -> CommandResult {
    let requester = ctx.author().name.clone();
    respond_embed(
        ctx,
        result.map(|text| embedded_messages::information(&text, &requester)),
    )
    .await
}

/// For commands that report success themselves: only failures produce a reply.
async fn report_failure(ctx: Context<'_>, result: MusicResult<()>) -> CommandResult {
    match result {
        Ok(()) => Ok(()),
        Err(err) => respond_embed(ctx, Err(err)).await,
    }
}
