use assert_matches::assert_matches;
use jukebox::commands::music::utils::errors::MusicError;
use jukebox::commands::music::utils::event_handlers::PlaybackEventRouter;
use jukebox::commands::music::utils::guild_player::{PlayerState, enqueue};
use jukebox::commands::music::utils::playback_node::{NodeEvent, NodeEventKind};
use jukebox::commands::music::utils::player_registry::PlayerRegistry;
use jukebox::commands::music::utils::queue::RepeatMode;
use jukebox::commands::music::utils::track_picker::Selection;
use poise::serenity_prelude::GuildId;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use crate::common::fixtures::{GUILD, OTHER_GUILD, VOICE_CHANNEL, named, titled};
use crate::common::init;
use crate::common::mocks::{FakeNodeFactory, MockMessenger, quiet_messenger};

struct Harness {
    factory: Arc<FakeNodeFactory>,
    players: Arc<PlayerRegistry>,
    router: PlaybackEventRouter,
}

impl Harness {
    fn new() -> Self {
        init();
        let factory = Arc::new(FakeNodeFactory::default());
        let players = Arc::new(PlayerRegistry::new(factory.clone()));
        let router = PlaybackEventRouter::new(players.clone());
        Self {
            factory,
            players,
            router,
        }
    }

    /// Connect the guild's player and queue `titles` as one playlist.
    async fn playing(titles: &[&str]) -> Self {
        let harness = Self::new();
        harness.start(GUILD, titles).await;
        harness
    }

    async fn start(&self, guild_id: GuildId, titles: &[&str]) {
        let player = self.players.get(guild_id);
        let mut player = player.lock().await;

        player.connect(Some(VOICE_CHANNEL), None).await.unwrap();
        player
            .add_tracks(Selection::Playlist {
                name: "Test".into(),
                tracks: titled(titles),
            })
            .await
            .unwrap();
    }

    /// The event the guild's current track would report.
    fn event(&self, guild_id: GuildId, kind: NodeEventKind) -> NodeEvent {
        NodeEvent {
            guild_id,
            generation: self.factory.node(guild_id).live_generation(),
            kind,
        }
    }

    async fn track_ended(&self, kind: NodeEventKind) {
        let event = self.event(GUILD, kind);
        self.factory.node(GUILD).finish_track();
        self.router.dispatch(event).await.unwrap();
    }
}

#[tokio::test]
async fn test_registry_creates_one_player_per_guild() {
    let harness = Harness::new();

    let first = harness.players.get(GUILD);
    let again = harness.players.get(GUILD);
    harness.players.get(OTHER_GUILD);

    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(harness.players.len(), 2);
    assert_eq!(harness.factory.created(), 2);
}

#[tokio::test]
async fn test_first_track_starts_and_later_ones_wait() {
    let harness = Harness::new();
    let player = harness.players.get(GUILD);
    player
        .lock()
        .await
        .connect(None, Some(VOICE_CHANNEL))
        .await
        .unwrap();

    let mut messenger = MockMessenger::new();
    messenger
        .expect_send()
        .withf(|text| text == "Added `A` to the queue!" || text == "Added `B` to the queue!")
        .times(2)
        .returning(|_| Ok(()));

    enqueue(&player, &messenger, Selection::Single(named("A")))
        .await
        .unwrap();
    enqueue(&player, &messenger, Selection::Picked(named("B")))
        .await
        .unwrap();

    let player = player.lock().await;
    assert_eq!(harness.factory.node(GUILD).played(), vec!["A"]);
    assert_eq!(player.queue().len(), 2);
    assert_eq!(player.state(), PlayerState::Playing);
}

#[test_case(NodeEventKind::TrackEnded ; "ended")]
#[test_case(NodeEventKind::TrackStuck ; "stuck")]
#[test_case(NodeEventKind::TrackException ; "exception")]
#[tokio::test]
async fn test_every_event_kind_advances(kind: NodeEventKind) {
    let harness = Harness::playing(&["A", "B", "C"]).await;

    harness.track_ended(kind).await;

    assert_eq!(harness.factory.node(GUILD).played(), vec!["A", "B"]);
}

#[tokio::test]
async fn test_repeat_one_replays_the_current_track() {
    let harness = Harness::playing(&["A", "B"]).await;
    harness
        .players
        .get(GUILD)
        .lock()
        .await
        .set_repeat(RepeatMode::One);

    harness.track_ended(NodeEventKind::TrackEnded).await;
    harness.track_ended(NodeEventKind::TrackEnded).await;

    assert_eq!(harness.factory.node(GUILD).played(), vec!["A", "A", "A"]);
}

#[tokio::test]
async fn test_queue_runs_out_quietly() {
    let harness = Harness::playing(&["A", "B"]).await;

    harness.track_ended(NodeEventKind::TrackEnded).await;
    harness.track_ended(NodeEventKind::TrackEnded).await;
    harness.track_ended(NodeEventKind::TrackEnded).await;

    let node = harness.factory.node(GUILD);
    assert_eq!(node.played(), vec!["A", "B"]);
    assert_eq!(node.loaded(), None);

    let player = harness.players.get(GUILD);
    assert_eq!(player.lock().await.state(), PlayerState::Idle);
}

#[tokio::test]
async fn test_repeat_all_wraps_around() {
    let harness = Harness::playing(&["A", "B"]).await;
    harness
        .players
        .get(GUILD)
        .lock()
        .await
        .set_repeat(RepeatMode::All);

    harness.track_ended(NodeEventKind::TrackEnded).await;
    harness.track_ended(NodeEventKind::TrackEnded).await;

    assert_eq!(harness.factory.node(GUILD).played(), vec!["A", "B", "A"]);
}

#[tokio::test]
async fn test_events_for_unknown_guilds_are_ignored() {
    let harness = Harness::new();

    harness
        .router
        .dispatch(NodeEvent {
            guild_id: OTHER_GUILD,
            generation: 1,
            kind: NodeEventKind::TrackEnded,
        })
        .await
        .unwrap();

    assert!(harness.players.is_empty());
}

#[tokio::test]
async fn test_stop_then_end_event_does_not_restart() {
    let harness = Harness::playing(&["A", "B"]).await;
    let stopped = harness.event(GUILD, NodeEventKind::TrackEnded);
    harness.players.get(GUILD).lock().await.stop().await.unwrap();

    harness.router.dispatch(stopped).await.unwrap();

    let node = harness.factory.node(GUILD);
    assert_eq!(node.played(), vec!["A"]);
    assert_eq!(node.stops(), 1);
}

#[tokio::test]
async fn test_end_event_queued_behind_a_skip_is_dropped() {
    let harness = Harness::playing(&["A", "B", "C"]).await;
    let ended = harness.event(GUILD, NodeEventKind::TrackEnded);
    harness.factory.node(GUILD).finish_track();

    harness.players.get(GUILD).lock().await.skip().await.unwrap();
    harness.router.dispatch(ended).await.unwrap();

    let player = harness.players.get(GUILD);
    assert_eq!(harness.factory.node(GUILD).played(), vec!["A", "B"]);
    assert_eq!(player.lock().await.queue().current().unwrap().title, "B");
}

#[tokio::test]
async fn test_end_event_from_stop_does_not_skip_the_next_request() {
    let harness = Harness::playing(&["A", "B"]).await;
    let player = harness.players.get(GUILD);
    let stopped = harness.event(GUILD, NodeEventKind::TrackEnded);
    player.lock().await.stop().await.unwrap();

    enqueue(&player, &quiet_messenger(), Selection::Single(named("X")))
        .await
        .unwrap();
    harness.router.dispatch(stopped).await.unwrap();
    enqueue(&player, &quiet_messenger(), Selection::Single(named("Y")))
        .await
        .unwrap();

    assert_eq!(harness.factory.node(GUILD).loaded().as_deref(), Some("X"));
    assert_eq!(player.lock().await.queue().current().unwrap().title, "X");

    harness.track_ended(NodeEventKind::TrackEnded).await;
    assert_eq!(harness.factory.node(GUILD).played(), vec!["A", "X", "Y"]);
}

#[tokio::test]
async fn test_skip_to_then_natural_end_continues_from_there() {
    let harness = Harness::playing(&["A", "B", "C", "D"]).await;
    harness.players.get(GUILD).lock().await.skip_to(3).await.unwrap();

    harness.track_ended(NodeEventKind::TrackEnded).await;

    assert_eq!(harness.factory.node(GUILD).played(), vec!["A", "C", "D"]);
}

#[tokio::test]
async fn test_pause_and_resume() {
    let harness = Harness::playing(&["A"]).await;
    let player = harness.players.get(GUILD);
    let mut player = player.lock().await;

    player.pause().await.unwrap();
    assert_eq!(player.state(), PlayerState::Paused);
    assert_matches!(player.pause().await, Err(MusicError::PlayerAlreadyPaused));

    player.resume().await.unwrap();
    assert_eq!(player.state(), PlayerState::Playing);
}

#[tokio::test]
async fn test_empty_channel_tears_the_guild_down() {
    let harness = Harness::playing(&["A"]).await;

    assert!(!harness.players.on_voice_membership(GUILD, 2).await);
    assert!(harness.players.contains(GUILD));

    assert!(harness.players.on_voice_membership(GUILD, 0).await);
    assert!(!harness.players.contains(GUILD));
    assert_eq!(harness.factory.node(GUILD).destroyed(), 1);
}

#[tokio::test]
async fn test_teardown_of_unknown_guild() {
    let harness = Harness::new();
    assert!(!harness.players.teardown(GUILD).await);
}

#[tokio::test]
async fn test_shutdown_tears_everything_down() {
    let harness = Harness::playing(&["A"]).await;
    harness.players.get(OTHER_GUILD);

    harness.players.shutdown().await;

    assert!(harness.players.is_empty());
    assert_eq!(harness.factory.node(GUILD).destroyed(), 1);
    assert_eq!(harness.factory.node(OTHER_GUILD).destroyed(), 1);
}

#[tokio::test]
async fn test_router_task_drains_the_channel() {
    let harness = Harness::playing(&["A", "B", "C"]).await;
    let (events, events_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(harness.router.clone().run(events_rx));

    let ended = harness.event(GUILD, NodeEventKind::TrackEnded);
    harness.factory.node(GUILD).finish_track();
    events.send(ended).unwrap();
    drop(events);
    task.await.unwrap();

    assert_eq!(harness.factory.node(GUILD).played(), vec!["A", "B"]);
}

#[tokio::test]
async fn test_busy_guild_does_not_hold_up_other_guilds() {
    let harness = Harness::playing(&["A", "B"]).await;
    harness.start(OTHER_GUILD, &["X", "Y"]).await;

    let (events, events_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(harness.router.clone().run(events_rx));

    let busy = harness.players.get(GUILD);
    let guard = busy.lock().await;

    events
        .send(harness.event(GUILD, NodeEventKind::TrackEnded))
        .unwrap();
    harness.factory.node(OTHER_GUILD).finish_track();
    events
        .send(harness.event(OTHER_GUILD, NodeEventKind::TrackEnded))
        .unwrap();

    let other = harness.factory.node(OTHER_GUILD);
    timeout(Duration::from_secs(2), async {
        while other.played().len() < 2 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("the other guild never advanced");
    assert_eq!(harness.factory.node(GUILD).played(), vec!["A"]);

    drop(guard);
    drop(events);
    task.await.unwrap();

    assert_eq!(other.played(), vec!["X", "Y"]);
    assert_eq!(harness.factory.node(GUILD).played(), vec!["A", "B"]);
}
