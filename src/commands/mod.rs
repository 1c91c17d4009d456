//! This module aggregates all the command modules for the bot.

/// Commands related to music playback (queue, player controls, voice connection).
pub mod music;
