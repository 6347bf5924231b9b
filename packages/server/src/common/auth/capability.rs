/// Capabilities in the theme portal
///
/// This is a simplified model focused on moderation operations since every
/// privileged surface in the portal is a moderator action; submitters never
/// hold capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCapability {
    /// View the pending review queue and individual submissions under review
    ReviewSubmissions,

    /// Approve a pending submission
    ApproveSubmission,

    /// Reject a pending submission (optionally banning the submitter)
    RejectSubmission,

    /// Ban or unban a user from submitting
    ManageBans,

    /// Fan an announcement out to all users
    PublishAnnouncements,
}

impl AdminCapability {
    /// Check if this capability requires admin access
    pub fn requires_admin(&self) -> bool {
        // All capabilities in this system require admin access
        true
    }
}
