//! Wayfarer - travel-planning agent dispatch service
//!
//! An axum backend that classifies incoming chat messages, routes them
//! to specialist agents, and persists each turn as an append-only
//! message log mirrored to clients over SSE. The `session` module is
//! the client-side counterpart: a per-conversation state machine with
//! cooperative cancellation.

pub mod agents;
pub mod api;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod flights;
pub mod intent;
pub mod llm;
pub mod session;
pub mod store;
