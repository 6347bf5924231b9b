//! Kernel module - server infrastructure shared by all domains.

pub mod outbox;

pub use outbox::{
    NewOutboxEntry, OutboxDispatcher, OutboxDispatcherConfig, OutboxEntry, OutboxStatus,
};
