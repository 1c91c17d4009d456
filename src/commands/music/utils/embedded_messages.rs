use poise::{CreateReply, serenity_prelude as serenity};
use serenity::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};
use std::time::Duration;

use super::errors::MusicError;
use super::format_duration;
use super::guild_player::NowPlaying;
use super::queue::Queue;

const INFO_COLOR: u32 = 0x3498db;
const ERROR_COLOR: u32 = 0xff0000;

/// Discord rejects embed field values longer than this.
const FIELD_LIMIT: usize = 1024;

fn requested_by(requester: &str) -> CreateEmbedFooter {
    CreateEmbedFooter::new(format!("Requested by {}", requester))
}

/// Create a progress bar for the current track
fn format_progress_bar(position: Duration, total: Duration) -> String {
    const BAR_LENGTH: usize = 15;
    let progress = if total.as_secs() == 0 {
        0.0
    } else {
        (position.as_secs_f64() / total.as_secs_f64()).min(1.0)
    };

    let filled = (progress * BAR_LENGTH as f64).round() as usize;
    let empty = BAR_LENGTH - filled;

    format!("▬{}🔘{}▬", "▬".repeat(filled), "▬".repeat(empty))
}

/// Join lines until the next one would not fit in a field.
fn fit_field(lines: impl IntoIterator<Item = String>) -> String {
    let mut value = String::new();
    for line in lines {
        if value.len() + line.len() + 1 > FIELD_LIMIT {
            break;
        }
        if !value.is_empty() {
            value.push('\n');
        }
        value.push_str(&line);
    }
    value
}

/// Plain informational embed
pub fn information(text: &str, requester: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Information")
        .description(text)
        .footer(requested_by(requester))
        .color(INFO_COLOR)
}

/// Embed for a command that could not be carried out
pub fn failure(text: &str, requester: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Information")
        .description(text)
        .footer(requested_by(requester))
        .color(ERROR_COLOR)
}

/// Create the track picker prompt
pub fn track_choice(options: &[String], requester: &str) -> CreateEmbed {
    CreateEmbed::new()
        .author(CreateEmbedAuthor::new("Query results"))
        .title("Choose a song")
        .description(options.join("\n"))
        .footer(requested_by(requester))
        .color(INFO_COLOR)
}

/// Create an embed for the music queue, showing up to `show` upcoming tracks
pub fn queue_list(queue: &Queue, show: usize, requester: &str) -> CreateEmbed {
    let current = queue
        .current()
        .map(|track| format!("{} `{}`", track.title, format_duration(track.duration)))
        .unwrap_or_else(|_| "No tracks currently playing.".to_string());

    let mut embed = CreateEmbed::new()
        .author(CreateEmbedAuthor::new("Query Results"))
        .title("Queue List")
        .description(format!("Showing up to next {} tracks", show))
        .field("Currently playing", current, false)
        .footer(requested_by(requester))
        .color(INFO_COLOR);

    let upcoming = queue.upcoming().unwrap_or_default();
    if !upcoming.is_empty() {
        // Numbers match what `skipto` and `remove` expect.
        let first = queue.position() + 2;
        let lines = upcoming.iter().take(show).enumerate().map(|(i, track)| {
            format!(
                "`{}.` {} `{}`",
                first + i,
                track.title,
                format_duration(track.duration)
            )
        });
        embed = embed.field("Next up", fit_field(lines), false);
    }

    embed
}

/// Create an embed for the track that is playing
pub fn now_playing(now: &NowPlaying, requester: &str) -> CreateEmbed {
    let NowPlaying { track, position } = now;

    CreateEmbed::new()
        .author(CreateEmbedAuthor::new("Playback Information"))
        .title("Now Playing")
        .field("Track title", format!("[{}]({})", track.title, track.uri), false)
        .field("Artist", &track.author, false)
        .field(
            "Position",
            format!(
                "{} `{}/{}`",
                format_progress_bar(*position, track.duration),
                format_duration(*position),
                format_duration(track.duration)
            ),
            false,
        )
        .footer(requested_by(requester))
        .color(INFO_COLOR)
}

/// What the author is told when a command fails with `err`.
///
/// Returns `None` for infrastructure failures, which are left to the framework's error
/// handler.
pub fn music_error_text(err: &MusicError) -> Option<String> {
    let text = match err {
        MusicError::NotInGuild => "This command only works in a server!!".to_string(),
        MusicError::QueueEmpty => "The Queue is empty!!".to_string(),
        MusicError::NoCurrentTrack => "Reached the end of the queue!!".to_string(),
        MusicError::NoTracksFound => "Couldn't find a track!!".to_string(),
        MusicError::AlreadyConnected => "The bot is already connected in channel!!".to_string(),
        MusicError::NoVoiceChannel => "No suitable voice channel was provided!!".to_string(),
        MusicError::NotConnected => "The bot is not in voice channel!!".to_string(),
        MusicError::PlayerAlreadyPaused => "The song already paused!!".to_string(),
        MusicError::NothingPlaying => "There is no song currently playing!!".to_string(),
        MusicError::NoMoreTracks => "No more tracks in queue!!".to_string(),
        MusicError::InvalidRepeatMode(mode) => {
            format!("`{}` is not a repeat mode, use `none`, `1` or `all`!!", mode)
        }
        MusicError::VolumeTooHigh(_) => "The volume is too high!!".to_string(),
        MusicError::VolumeTooLow(_) => "The volume is too low!!".to_string(),
        MusicError::MaxVolume => "The player is already at max volume!!".to_string(),
        MusicError::MinVolume => "The player is already at min volume!!".to_string(),
        MusicError::Node(_) | MusicError::AudioSource(_) | MusicError::Discord(_) => return None,
    };
    Some(text)
}

/// Reply for a failed command, or `None` if the error should propagate.
pub fn music_error(err: &MusicError, requester: &str) -> Option<CreateReply> {
    music_error_text(err).map(|text| CreateReply::default().embed(failure(&text, requester)))
}
