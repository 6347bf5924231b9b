/// Authorization module for the theme portal
///
/// Provides a fluent API for authorization checks in action code:
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, AdminCapability};
///
/// // In an action:
/// Actor::new(actor.id, actor.is_admin)
///     .can(AdminCapability::ApproveSubmission)
///     .check()?;
/// ```
///
/// This pattern keeps authorization logic in the action layer where it
/// belongs, not in the HTTP handler layer.
mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::AdminCapability;
pub use errors::AuthError;
