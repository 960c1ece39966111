#![allow(clippy::doc_markdown)] // Allow technical terms like WebSocket, RabbitMQ in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # A.R.E.S. Orchestration Core
//!
//! Rust implementation of the orchestration core for the A.R.E.S.
//! multi-agent security-assessment platform.
//!
//! ## Overview
//!
//! The core owns missions: bounded assessment campaigns over a target scope.
//! Workers (recon, scanning, analysis, exploitation, persistence agents)
//! report results as events; the core validates them, assigns each mission a
//! gap-free sequence, advances per-target state machines, dispatches the next
//! stage of work with deadlines and retries, and fans the ordered event
//! stream out to live dashboards.
//!
//! ## Architecture
//!
//! Every mission is owned by one actor task; all mutations for a mission are
//! serialized through its command channel while distinct missions proceed in
//! parallel. The state projection itself ([`orchestration::store`]) is pure
//! and synchronous, which keeps replay deterministic.
//!
//! ## Module Organization
//!
//! - [`models`] - Missions, targets, findings
//! - [`state_machine`] - Mission status and per-target stage transitions
//! - [`events`] - Raw event envelopes and sealed sequenced events
//! - [`messaging`] - Work queues and the event bus abstraction
//! - [`orchestration`] - Core, per-mission actors, dispatch, state store
//! - [`broadcast`] - Ordered fan-out to live subscribers
//! - [`web`] - REST and WebSocket surface
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling

pub mod broadcast;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod state_machine;
pub mod web;

pub use config::{AresConfig, ConfigManager};
pub use error::{AresError, Result};
pub use orchestration::OrchestrationCore;
