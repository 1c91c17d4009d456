use rand::seq::SliceRandom;
use std::fmt;
use std::str::FromStr;

use super::errors::{MusicError, MusicResult};
use crate::commands::music::audio_sources::Track;

/// What happens when the cursor runs past the last track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    #[default]
    None,
    /// Replay the current track whenever it ends.
    One,
    /// Wrap around to the first track.
    All,
}

impl FromStr for RepeatMode {
    type Err = MusicError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "none" => Ok(RepeatMode::None),
            "1" => Ok(RepeatMode::One),
            "all" => Ok(RepeatMode::All),
            other => Err(MusicError::InvalidRepeatMode(other.to_string())),
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RepeatMode::None => "none",
            RepeatMode::One => "1",
            RepeatMode::All => "all",
        })
    }
}

/// A guild's playlist: ordered tracks, a cursor on the one playing, and a repeat mode.
///
/// The cursor is only dereferenced while `position < items.len()`. After an exhausting
/// `advance` it rests at `items.len()`, so tracks added later become current.
#[derive(Debug, Default)]
pub struct Queue {
    items: Vec<Track>,
    position: usize,
    repeat_mode: RepeatMode,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    /// The track under the cursor.
    pub fn current(&self) -> MusicResult<&Track> {
        if self.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        self.items
            .get(self.position)
            .ok_or(MusicError::NoCurrentTrack)
    }

    /// Tracks after the cursor.
    pub fn upcoming(&self) -> MusicResult<&[Track]> {
        if self.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        Ok(self.items.get(self.position + 1..).unwrap_or_default())
    }

    /// Tracks before the cursor.
    pub fn history(&self) -> MusicResult<&[Track]> {
        if self.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        Ok(&self.items[..self.position.min(self.items.len())])
    }

    /// Appends tracks in order. Never moves the cursor.
    pub fn add<I>(&mut self, tracks: I)
    where
        I: IntoIterator<Item = Track>,
    {
        self.items.extend(tracks);
    }

    /// Moves the cursor forward and returns the new current track.
    ///
    /// `Ok(None)` means the queue is exhausted; with `RepeatMode::All` the cursor
    /// wraps to the first track instead.
    pub fn advance(&mut self) -> MusicResult<Option<&Track>> {
        if self.is_empty() {
            return Err(MusicError::QueueEmpty);
        }

        self.position = (self.position + 1).min(self.items.len());

        if self.position == self.items.len() {
            if self.repeat_mode != RepeatMode::All {
                return Ok(None);
            }
            self.position = 0;
        }

        Ok(self.items.get(self.position))
    }

    /// Puts the cursor on `index` (0-based) and returns that track.
    pub fn jump_to(&mut self, index: usize) -> MusicResult<&Track> {
        if self.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        if index >= self.items.len() {
            return Err(MusicError::NoMoreTracks);
        }

        self.position = index;
        Ok(&self.items[index])
    }

    /// Randomly reorders the upcoming tracks; history and the current track stay put.
    pub fn shuffle(&mut self) -> MusicResult<()> {
        if self.is_empty() {
            return Err(MusicError::QueueEmpty);
        }

        if let Some(upcoming) = self.items.get_mut(self.position + 1..) {
            upcoming.shuffle(&mut rand::rng());
        }
        Ok(())
    }

    /// Sets the repeat mode from user text. Unrecognised text leaves the mode unchanged.
    pub fn set_repeat_mode(&mut self, mode: &str) {
        if let Ok(mode) = mode.parse() {
            self.repeat_mode = mode;
        }
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat_mode = mode;
    }

    /// Removes the track at `index` (0-based).
    ///
    /// Removing a track before the cursor shifts the cursor so the current track stays
    /// current; removing the current track leaves the cursor on its successor.
    pub fn remove_at(&mut self, index: usize) -> MusicResult<Track> {
        if self.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        if index >= self.items.len() {
            return Err(MusicError::NoMoreTracks);
        }

        let removed = self.items.remove(index);
        if index < self.position {
            self.position -= 1;
        }
        Ok(removed)
    }

    /// Drops every track and rewinds the cursor.
    pub fn empty(&mut self) {
        self.items.clear();
        self.position = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.items.iter()
    }
}
