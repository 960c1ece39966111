//! # Subscriber Frames and Handles
//!
//! A subscription is an explicit handle with its own bounded queue and an
//! independent read cursor. Frames are what travel to a dashboard: ordered
//! mission events, an explicit end-of-mission marker, and a gap marker for
//! subscribers whose requested start precedes the retained backlog.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::events::MissionEvent;
use crate::state_machine::MissionStatus;

/// A frame delivered to a subscriber
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "frame", content = "data", rename_all = "snake_case")]
pub enum StreamFrame {
    /// An ordered mission event
    Event(Arc<MissionEvent>),
    /// The requested starting sequence precedes the retained backlog; the
    /// subscriber must resynchronize from a mission snapshot
    Gap { retained_from: u64 },
    /// The mission reached a terminal status; no further frames will follow
    EndOfMission { status: MissionStatus },
}

impl StreamFrame {
    /// Sequence number if this frame carries an event
    pub fn sequence(&self) -> Option<u64> {
        match self {
            Self::Event(event) => Some(event.sequence),
            _ => None,
        }
    }
}

/// A live subscription to one mission's event stream
///
/// Backfill frames (served from the retained backlog) are yielded before any
/// live frame; the hub guarantees the two segments are contiguous because
/// registration and publishing happen under the same lock.
pub struct Subscription {
    pub id: Uuid,
    pub mission_id: Uuid,
    pub(crate) backfill: VecDeque<StreamFrame>,
    pub(crate) rx: mpsc::Receiver<StreamFrame>,
}

impl Subscription {
    /// Receive the next frame in order
    ///
    /// Returns `None` once the stream is finished: either the hub dropped
    /// this subscriber for falling behind, or an `EndOfMission` frame was
    /// already yielded and the channel closed.
    pub async fn next_frame(&mut self) -> Option<StreamFrame> {
        if let Some(frame) = self.backfill.pop_front() {
            return Some(frame);
        }
        self.rx.recv().await
    }

    /// Non-blocking variant: next frame if one is immediately available
    pub fn try_next_frame(&mut self) -> Option<StreamFrame> {
        if let Some(frame) = self.backfill.pop_front() {
            return Some(frame);
        }
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventType, RawEvent};

    #[test]
    fn test_frame_serializes_with_tag() {
        let raw = RawEvent::new(EventType::ReconStarted, "recon-engine", Uuid::new_v4());
        let frame = StreamFrame::Event(Arc::new(MissionEvent::seal(raw, 1)));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["frame"], "event");
        assert_eq!(json["data"]["sequence"], 1);

        let gap = StreamFrame::Gap { retained_from: 40 };
        let json = serde_json::to_value(&gap).unwrap();
        assert_eq!(json["frame"], "gap");
        assert_eq!(json["data"]["retained_from"], 40);
    }
}
