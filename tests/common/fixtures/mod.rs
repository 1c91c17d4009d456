//! Test fixtures for the jukebox bot
//! Tracks are generated with `fake` so tests never depend on a particular title or length

use fake::Fake;
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use jukebox::commands::music::audio_sources::Track;
use poise::serenity_prelude::{ChannelId, GuildId};
use std::time::Duration;

pub const GUILD: GuildId = GuildId::new(1_000);
pub const OTHER_GUILD: GuildId = GuildId::new(2_000);
pub const VOICE_CHANNEL: ChannelId = ChannelId::new(3_000);

/// A track with a random title, artist and length
pub fn track() -> Track {
    let words: Vec<String> = Words(1..5).fake();
    named(&words.join(" "))
}

/// A track with a known title and random everything else
pub fn named(title: &str) -> Track {
    let video: u64 = (1..99_999_999_999u64).fake();
    let secs: u64 = (30..600u64).fake();
    let author: String = Name().fake();

    Track::new(
        format!("https://www.youtube.com/watch?v={:011}", video),
        title,
        author,
        Duration::from_secs(secs),
    )
}

/// `count` random tracks
pub fn tracks(count: usize) -> Vec<Track> {
    (0..count).map(|_| track()).collect()
}

/// One track per title, in order
pub fn titled(titles: &[&str]) -> Vec<Track> {
    titles.iter().map(|title| named(title)).collect()
}
