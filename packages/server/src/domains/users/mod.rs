//! Users domain - identity snapshots and submission standing
//!
//! User rows are created by the identity-provider callback; this domain only
//! reads them (directory lookups, contributor validation) and mutates the
//! ban fields through the moderation engine.

pub mod actions;
pub mod models;

pub use models::user::User;
