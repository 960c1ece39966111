//! # Web API Request Handlers
//!
//! Contains all HTTP request handlers organized by functional area.

pub mod events;
pub mod health;
pub mod missions;
pub mod stream;
