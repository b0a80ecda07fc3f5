//! Shared types used across domain resources.

use serde::{Deserialize, Serialize};

/// The lifecycle status carried by accounts, applications, directories and
/// groups.
///
/// Serialized in upper case on the wire (`"ENABLED"`, `"DISABLED"`,
/// `"UNVERIFIED"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    /// The resource is active and usable.
    Enabled,
    /// The resource is deactivated; accounts in this state cannot log in.
    Disabled,
    /// The account was created but its email is not yet verified.
    Unverified,
}

impl ResourceStatus {
    /// Returns `true` for [`Self::Enabled`].
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}
