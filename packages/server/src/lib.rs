// Community Theme Portal - API Core
//
// This crate provides the backend for the theme submission portal: the
// submission lifecycle and moderation engine, the notification outbox, and
// the HTTP surface the client package talks to.
//
// Architecture follows domain-driven design; durable side effects run
// through the outbox in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
