use super::{AdminCapability, AuthError};
use crate::common::entity_ids::UserId;

/// Entry point for authorization checks
///
/// Usage:
/// ```rust,ignore
/// Actor::new(actor_id, is_admin)
///     .can(AdminCapability::ApproveSubmission)
///     .check()?;
/// ```
pub struct Actor {
    actor_id: UserId,
    is_admin: bool,
}

impl Actor {
    /// Create a new actor for authorization checks
    ///
    /// # Arguments
    /// * `actor_id` - The user ID of the actor
    /// * `is_admin` - Admin flag from the user row loaded during
    ///   authentication (the database is the source of truth, not the token)
    pub fn new(actor_id: UserId, is_admin: bool) -> Self {
        Self { actor_id, is_admin }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: AdminCapability) -> CapabilityBuilder {
        CapabilityBuilder {
            actor_id: self.actor_id,
            is_admin: self.is_admin,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    actor_id: UserId,
    is_admin: bool,
    capability: AdminCapability,
}

impl CapabilityBuilder {
    /// Perform the authorization check
    ///
    /// The check is synchronous: the admin flag was loaded from the users
    /// table by the auth middleware on this same request, so there is
    /// nothing further to look up.
    pub fn check(self) -> Result<(), AuthError> {
        if self.capability.requires_admin() && !self.is_admin {
            tracing::debug!(
                actor_id = %self.actor_id,
                capability = ?self.capability,
                "authorization denied"
            );
            return Err(AuthError::AdminRequired);
        }

        Ok(())
    }
}
