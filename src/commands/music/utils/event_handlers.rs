use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use poise::serenity_prelude as serenity;
use ::serenity::async_trait;
use songbird::tracks::{PlayError, PlayMode};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::errors::{MusicError, MusicResult};
use super::playback_node::{NodeEvent, NodeEventKind};
use super::player_registry::PlayerRegistry;
use super::queue::RepeatMode;

/// Songbird event handler attached to every track a `SongbirdNode` plays.
///
/// Forwards at most one `NodeEvent` per track, and only while that track is still the
/// node's live one.
#[derive(Clone)]
pub struct TrackLifecycleNotifier {
    guild_id: serenity::GuildId,
    owner: u64,
    generation: Arc<AtomicU64>,
    events: UnboundedSender<NodeEvent>,
}

impl TrackLifecycleNotifier {
    pub fn new(
        guild_id: serenity::GuildId,
        owner: u64,
        generation: Arc<AtomicU64>,
        events: UnboundedSender<NodeEvent>,
    ) -> Self {
        Self {
            guild_id,
            owner,
            generation,
            events,
        }
    }

    fn classify(mode: &PlayMode) -> NodeEventKind {
        match mode {
            PlayMode::Errored(PlayError::Decode(_)) => NodeEventKind::TrackStuck,
            PlayMode::Errored(_) => NodeEventKind::TrackException,
            _ => NodeEventKind::TrackEnded,
        }
    }

    fn notify(&self, kind: NodeEventKind) {
        let claimed = self
            .generation
            .compare_exchange(self.owner, self.owner + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if !claimed {
            debug!(
                "Ignoring {:?} from a replaced track in guild {}",
                kind, self.guild_id
            );
            return;
        }

        let event = NodeEvent {
            guild_id: self.guild_id,
            generation: self.owner,
            kind,
        };
        if self.events.send(event).is_err() {
            error!("Playback event channel closed, dropping {:?}", event);
        }
    }
}

#[async_trait]
impl songbird::EventHandler for TrackLifecycleNotifier {
    async fn act(&self, ctx: &songbird::EventContext<'_>) -> Option<songbird::Event> {
        if let songbird::EventContext::Track(tracks) = ctx {
            for (state, _handle) in tracks.iter() {
                self.notify(Self::classify(&state.playing));
            }
        }
        None
    }
}

/// Routes node lifecycle events to the guild player that owns the node.
#[derive(Clone)]
pub struct PlaybackEventRouter {
    players: Arc<PlayerRegistry>,
}

impl PlaybackEventRouter {
    pub fn new(players: Arc<PlayerRegistry>) -> Self {
        Self { players }
    }

    /// Handles one event. Ended, stuck and errored tracks are all treated alike:
    /// repeat-one replays the track, anything else advances the queue.
    pub async fn dispatch(&self, event: NodeEvent) -> MusicResult<()> {
        match event.kind {
            NodeEventKind::TrackEnded => info!("Track ended for guild {}", event.guild_id),
            kind => warn!("Track failed ({:?}) for guild {}", kind, event.guild_id),
        }

        let Some(player) = self.players.existing(event.guild_id) else {
            debug!("No player for guild {}, ignoring event", event.guild_id);
            return Ok(());
        };

        let mut player = player.lock().await;
        // A command may have replaced the track while this event was queued.
        if !player.owns(event.generation) {
            debug!(
                "Dropping stale {:?} for guild {}",
                event.kind, event.guild_id
            );
            return Ok(());
        }

        let result = if player.queue().repeat_mode() == RepeatMode::One {
            player.repeat_track().await
        } else {
            player.advance().await
        };

        match result {
            Err(MusicError::QueueEmpty | MusicError::NoCurrentTrack) => {
                debug!("Nothing left to play for guild {}", event.guild_id);
                Ok(())
            }
            other => other,
        }
    }

    /// Consumes the node event channel until every sender is gone.
    ///
    /// Each guild gets its own lane, so a guild whose player is busy never holds up
    /// events for the others. Events for one guild are still handled in order.
    pub async fn run(self, mut events: UnboundedReceiver<NodeEvent>) {
        info!("Playback event router started");

        let mut lanes: HashMap<serenity::GuildId, UnboundedSender<NodeEvent>> = HashMap::new();
        let mut workers = Vec::new();

        while let Some(event) = events.recv().await {
            let lane = lanes.entry(event.guild_id).or_insert_with(|| {
                let (lane, worker) = self.spawn_lane(event.guild_id);
                workers.push(worker);
                lane
            });

            if let Err(mpsc::error::SendError(event)) = lane.send(event) {
                warn!("Event lane for guild {} died, restarting it", event.guild_id);
                let (lane, worker) = self.spawn_lane(event.guild_id);
                workers.push(worker);
                if lane.send(event).is_err() {
                    error!("Dropping {:?} for guild {}", event.kind, event.guild_id);
                }
                lanes.insert(event.guild_id, lane);
            }
        }

        drop(lanes);
        join_all(workers).await;
        info!("Playback event router stopped");
    }

    fn spawn_lane(
        &self,
        guild_id: serenity::GuildId,
    ) -> (UnboundedSender<NodeEvent>, JoinHandle<()>) {
        debug!("Opening event lane for guild {}", guild_id);
        let (lane, mut rx) = mpsc::unbounded_channel::<NodeEvent>();
        let router = self.clone();

        let worker = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(e) = router.dispatch(event).await {
                    error!(
                        "Failed to handle {:?} for guild {}: {}",
                        event.kind, event.guild_id, e
                    );
                }
            }
        });
        (lane, worker)
    }
}
