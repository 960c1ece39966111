//! # Broadcast Hub
//!
//! Fan-out of each mission's ordered event log to N concurrent subscribers.
//! The publish path never blocks: every subscriber has a bounded queue and a
//! subscriber that cannot keep up is disconnected rather than slowing the
//! orchestrator or growing memory without bound. A bounded backlog per
//! mission serves late joiners that request a starting sequence number.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::subscriber::{StreamFrame, Subscription};
use crate::config::BroadcastConfig;
use crate::events::MissionEvent;
use crate::state_machine::MissionStatus;

/// Per-mission channel state, guarded by one lock so that backlog appends and
/// subscriber registration cannot interleave (which would create gaps)
struct MissionChannel {
    backlog: VecDeque<Arc<MissionEvent>>,
    subscribers: HashMap<Uuid, mpsc::Sender<StreamFrame>>,
    /// Set once the mission reached a terminal status
    closed: Option<MissionStatus>,
}

impl MissionChannel {
    fn new() -> Self {
        Self {
            backlog: VecDeque::new(),
            subscribers: HashMap::new(),
            closed: None,
        }
    }

    fn retained_from(&self) -> Option<u64> {
        self.backlog.front().map(|event| event.sequence)
    }
}

/// Result of publishing one event through the hub
#[derive(Debug, Default)]
pub struct PublishOutcome {
    /// The backlog hit its ceiling and evicted its oldest event
    pub backlog_evicted: bool,
    /// Subscribers disconnected on this publish for having a full queue
    pub dropped_subscribers: Vec<Uuid>,
}

/// Mission-scoped event fan-out with bounded retention
pub struct BroadcastHub {
    config: BroadcastConfig,
    missions: Mutex<HashMap<Uuid, MissionChannel>>,
}

impl BroadcastHub {
    pub fn new(config: BroadcastConfig) -> Self {
        Self {
            config,
            missions: Mutex::new(HashMap::new()),
        }
    }

    /// Publish one event to every live subscriber of its mission
    ///
    /// Non-blocking by construction: delivery uses `try_send` into each
    /// subscriber's bounded queue, and a full queue disconnects that
    /// subscriber instead of waiting for it.
    pub fn publish(&self, event: MissionEvent) -> PublishOutcome {
        let mission_id = event.mission_id;
        let event = Arc::new(event);
        let mut outcome = PublishOutcome::default();

        let mut missions = self.missions.lock();
        let channel = missions.entry(mission_id).or_insert_with(MissionChannel::new);

        channel.backlog.push_back(Arc::clone(&event));
        if channel.backlog.len() > self.config.backlog_capacity {
            channel.backlog.pop_front();
            outcome.backlog_evicted = true;
        }

        channel.subscribers.retain(|subscriber_id, tx| {
            match tx.try_send(StreamFrame::Event(Arc::clone(&event))) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        mission_id = %mission_id,
                        subscriber_id = %subscriber_id,
                        "Subscriber queue full, disconnecting slow subscriber"
                    );
                    outcome.dropped_subscribers.push(*subscriber_id);
                    false
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });

        outcome
    }

    /// Subscribe to a mission's event stream
    ///
    /// With `from_sequence`, retained backlog events from that point are
    /// served first; if the requested start is older than the backlog, an
    /// explicit gap frame precedes the replay instead of silently skipping.
    /// Without it, delivery starts from the point of subscription.
    pub fn subscribe(&self, mission_id: Uuid, from_sequence: Option<u64>) -> Subscription {
        let (tx, rx) = mpsc::channel(self.config.subscriber_queue_capacity);
        let subscriber_id = Uuid::new_v4();
        let mut backfill = VecDeque::new();

        let mut missions = self.missions.lock();
        let channel = missions.entry(mission_id).or_insert_with(MissionChannel::new);

        if let Some(from) = from_sequence {
            if let Some(retained_from) = channel.retained_from() {
                if from < retained_from {
                    backfill.push_back(StreamFrame::Gap { retained_from });
                }
                for event in channel
                    .backlog
                    .iter()
                    .filter(|event| event.sequence >= from)
                {
                    backfill.push_back(StreamFrame::Event(Arc::clone(event)));
                }
            } else if from > 1 {
                // Nothing retained at all; anything before the live stream is gone
                backfill.push_back(StreamFrame::Gap { retained_from: from });
            }
        }

        if let Some(status) = channel.closed {
            backfill.push_back(StreamFrame::EndOfMission { status });
        } else {
            channel.subscribers.insert(subscriber_id, tx);
        }

        debug!(
            mission_id = %mission_id,
            subscriber_id = %subscriber_id,
            backfill_frames = backfill.len(),
            "Subscriber attached"
        );

        Subscription {
            id: subscriber_id,
            mission_id,
            backfill,
            rx,
        }
    }

    /// Detach a subscriber explicitly
    pub fn unsubscribe(&self, mission_id: Uuid, subscriber_id: Uuid) {
        let mut missions = self.missions.lock();
        if let Some(channel) = missions.get_mut(&mission_id) {
            channel.subscribers.remove(&subscriber_id);
        }
    }

    /// Terminate a mission's stream with an explicit end-of-mission marker
    ///
    /// Subscribers whose queue cannot take the final frame are dropped; their
    /// channel closing is still an unambiguous end-of-stream signal.
    pub fn close_mission(&self, mission_id: Uuid, status: MissionStatus) {
        let mut missions = self.missions.lock();
        if let Some(channel) = missions.get_mut(&mission_id) {
            channel.closed = Some(status);
            for (_, tx) in channel.subscribers.drain() {
                let _ = tx.try_send(StreamFrame::EndOfMission { status });
            }
        }
    }

    /// Number of live subscribers for a mission
    pub fn subscriber_count(&self, mission_id: Uuid) -> usize {
        self.missions
            .lock()
            .get(&mission_id)
            .map_or(0, |channel| channel.subscribers.len())
    }
}
