//! Behaviour of the music core as seen from commands and node events

mod playback_flow;
