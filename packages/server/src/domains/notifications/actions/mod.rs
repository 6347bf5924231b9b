pub mod announce;
pub mod feed;

pub use announce::{announce, AnnounceRequest};
pub use feed::{list_notifications, mark_all_read, MarkReadRequest};
