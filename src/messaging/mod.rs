//! # Messaging
//!
//! Wire messages and the event bus adapter for worker communication.

pub mod bus;
pub mod errors;
pub mod message;

pub use bus::{EventBus, InMemoryEventBus};
pub use errors::{MessagingError, MessagingResult};
pub use message::{WorkMessage, WorkMessageMetadata};
