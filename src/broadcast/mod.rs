//! # Broadcast Layer
//!
//! Ordered, mission-scoped event fan-out to live subscribers with bounded
//! queues and bounded backlog retention.

pub mod hub;
pub mod subscriber;

pub use hub::{BroadcastHub, PublishOutcome};
pub use subscriber::{StreamFrame, Subscription};
