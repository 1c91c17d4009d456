//! Test suite for the jukebox bot
//! Integration tests drive the player, registry and event router through fake collaborators

pub mod common;
pub mod integration;
