//! Capabilities checked by the access policy.

use serde::{Deserialize, Serialize};

/// An abstract permission held by a caller.
///
/// Capabilities are a property of the caller alone; the policy never inspects
/// resource data to decide them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Anyone, credentialed or not.
    Public,
    /// Any caller with a valid credential.
    Authenticated,
    /// Callers whose identity carries the staff flag.
    Staff,
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Capability::Public => write!(f, "public"),
            Capability::Authenticated => write!(f, "authenticated"),
            Capability::Staff => write!(f, "staff"),
        }
    }
}
