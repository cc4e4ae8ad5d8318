//! The resolved caller of a request.

use dentalis_core::IdentityId;

use crate::Capability;

/// Caller identity as resolved by the transport layer.
///
/// Both authentication mechanisms (bearer token, staff session cookie) funnel
/// into this one type; nothing downstream branches on which mechanism was
/// used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// No valid credential presented.
    Anonymous,
    /// A valid credential resolved to an identity.
    Known { id: IdentityId, staff: bool },
}

impl Caller {
    pub fn known(id: IdentityId, staff: bool) -> Self {
        Self::Known { id, staff }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Caller::Anonymous)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Caller::Known { staff: true, .. })
    }

    pub fn identity_id(&self) -> Option<IdentityId> {
        match self {
            Caller::Anonymous => None,
            Caller::Known { id, .. } => Some(*id),
        }
    }

    /// Whether this caller holds the given capability.
    pub fn holds(&self, capability: Capability) -> bool {
        match capability {
            Capability::Public => true,
            Capability::Authenticated => !self.is_anonymous(),
            Capability::Staff => self.is_staff(),
        }
    }
}
