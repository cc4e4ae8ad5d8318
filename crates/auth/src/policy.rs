//! Access policy evaluator.
//!
//! The single source of truth for who may do what: every endpoint consults
//! [`authorize`] before touching the store, so the policy table below is the
//! whole authorization surface and is testable without the transport layer.
//!
//! The evaluator decides from the caller alone and never queries resource
//! data. Self-scoped actions ("my profile", "book my appointment")
//! additionally resolve the caller's linked patient profile; that lookup
//! lives at the API boundary, after the capability check here has passed.

use thiserror::Error;

use crate::{Caller, Capability};

/// Resource types governed by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    BlogPost,
    FaqCategory,
    Review,
    Patient,
    DentalHistory,
    Prescription,
    Appointment,
    OwnProfile,
}

/// Actions a caller can attempt against a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

/// Outcome of a policy-table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Allowed for callers holding the capability.
    Requires(Capability),
    /// This system exposes no such operation (managed out-of-band).
    NotExposed,
}

/// Terminal deny outcomes; these surface directly as 401/403 with no retry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Deny {
    /// No valid credential presented.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Credential valid, capability insufficient.
    #[error("forbidden")]
    Forbidden,
}

/// Policy knobs that are deliberate configuration, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyConfig {
    /// Legacy mode: appointment list/retrieve visible to any caller with no
    /// ownership filter. Off by default; owner-or-staff visibility is the
    /// safe behavior.
    pub open_appointment_listing: bool,
}

/// The policy table: resource type × action → required capability.
pub fn required_access(resource: Resource, action: Action, config: &PolicyConfig) -> Access {
    use Access::{NotExposed, Requires};
    use Action::*;
    use Capability::*;

    match (resource, action) {
        // Public site content, managed out-of-band.
        (Resource::BlogPost | Resource::FaqCategory, List | Retrieve) => Requires(Public),
        (Resource::BlogPost | Resource::FaqCategory, _) => NotExposed,

        // Reviews: anyone reads, authenticated identities write, no edits.
        (Resource::Review, List | Retrieve) => Requires(Public),
        (Resource::Review, Create) => Requires(Authenticated),
        (Resource::Review, _) => NotExposed,

        // Patient records are the staff dashboard; deletion cascades.
        (Resource::Patient, List | Retrieve | Delete) => Requires(Staff),
        (Resource::Patient, _) => NotExposed,

        // Clinical records are staff-only end to end.
        (Resource::DentalHistory | Resource::Prescription, _) => Requires(Staff),

        // Appointments: patients book their own; staff manage them.
        (Resource::Appointment, List | Retrieve) => {
            if config.open_appointment_listing {
                Requires(Public)
            } else {
                Requires(Authenticated)
            }
        }
        (Resource::Appointment, Create) => Requires(Authenticated),
        (Resource::Appointment, Update | Delete) => Requires(Staff),

        // Self-scoped profile view.
        (Resource::OwnProfile, List | Retrieve) => Requires(Authenticated),
        (Resource::OwnProfile, _) => NotExposed,
    }
}

/// Authorize a `(caller, resource, action)` triple.
///
/// - No IO
/// - No panics
/// - Pure policy check; ownership scoping happens at the API boundary
pub fn authorize(
    caller: &Caller,
    resource: Resource,
    action: Action,
    config: &PolicyConfig,
) -> Result<(), Deny> {
    let allowed = match required_access(resource, action, config) {
        Access::Requires(capability) => caller.holds(capability),
        Access::NotExposed => false,
    };

    if allowed {
        Ok(())
    } else if caller.is_anonymous() {
        Err(Deny::Unauthenticated)
    } else {
        Err(Deny::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dentalis_core::IdentityId;

    const ALL_RESOURCES: [Resource; 8] = [
        Resource::BlogPost,
        Resource::FaqCategory,
        Resource::Review,
        Resource::Patient,
        Resource::DentalHistory,
        Resource::Prescription,
        Resource::Appointment,
        Resource::OwnProfile,
    ];

    const ALL_ACTIONS: [Action; 5] = [
        Action::List,
        Action::Retrieve,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    fn patient_caller() -> Caller {
        Caller::known(IdentityId::new(), false)
    }

    fn staff_caller() -> Caller {
        Caller::known(IdentityId::new(), true)
    }

    #[test]
    fn public_content_readable_by_anyone() {
        let config = PolicyConfig::default();
        for resource in [Resource::BlogPost, Resource::FaqCategory, Resource::Review] {
            assert!(authorize(&Caller::Anonymous, resource, Action::List, &config).is_ok());
            assert!(authorize(&Caller::Anonymous, resource, Action::Retrieve, &config).is_ok());
        }
    }

    #[test]
    fn review_create_requires_authentication() {
        let config = PolicyConfig::default();
        assert_eq!(
            authorize(&Caller::Anonymous, Resource::Review, Action::Create, &config),
            Err(Deny::Unauthenticated)
        );
        assert!(authorize(&patient_caller(), Resource::Review, Action::Create, &config).is_ok());
    }

    #[test]
    fn staff_gated_resources_deny_by_credential_state() {
        let config = PolicyConfig::default();
        for resource in [Resource::Patient, Resource::DentalHistory, Resource::Prescription] {
            assert_eq!(
                authorize(&Caller::Anonymous, resource, Action::List, &config),
                Err(Deny::Unauthenticated)
            );
            assert_eq!(
                authorize(&patient_caller(), resource, Action::List, &config),
                Err(Deny::Forbidden)
            );
            assert!(authorize(&staff_caller(), resource, Action::List, &config).is_ok());
        }
    }

    #[test]
    fn appointment_listing_is_authenticated_by_default() {
        let config = PolicyConfig::default();
        assert_eq!(
            authorize(&Caller::Anonymous, Resource::Appointment, Action::List, &config),
            Err(Deny::Unauthenticated)
        );
        assert!(authorize(&patient_caller(), Resource::Appointment, Action::List, &config).is_ok());
    }

    #[test]
    fn open_listing_mode_is_explicit_opt_in() {
        let config = PolicyConfig {
            open_appointment_listing: true,
        };
        assert!(authorize(&Caller::Anonymous, Resource::Appointment, Action::List, &config).is_ok());
    }

    #[test]
    fn appointment_mutation_is_staff_only() {
        let config = PolicyConfig::default();
        assert_eq!(
            authorize(&patient_caller(), Resource::Appointment, Action::Update, &config),
            Err(Deny::Forbidden)
        );
        assert!(authorize(&staff_caller(), Resource::Appointment, Action::Delete, &config).is_ok());
    }

    #[test]
    fn unexposed_operations_deny_even_staff() {
        let config = PolicyConfig::default();
        assert_eq!(
            authorize(&staff_caller(), Resource::BlogPost, Action::Create, &config),
            Err(Deny::Forbidden)
        );
        assert_eq!(
            authorize(&staff_caller(), Resource::Review, Action::Delete, &config),
            Err(Deny::Forbidden)
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_resource() -> impl Strategy<Value = Resource> {
            proptest::sample::select(ALL_RESOURCES.to_vec())
        }

        fn any_action() -> impl Strategy<Value = Action> {
            proptest::sample::select(ALL_ACTIONS.to_vec())
        }

        proptest! {
            /// Property: anonymous callers only ever pass public entries.
            #[test]
            fn anonymous_access_implies_public(
                resource in any_resource(),
                action in any_action(),
                open in proptest::bool::ANY,
            ) {
                let config = PolicyConfig { open_appointment_listing: open };
                if authorize(&Caller::Anonymous, resource, action, &config).is_ok() {
                    prop_assert_eq!(
                        required_access(resource, action, &config),
                        Access::Requires(Capability::Public)
                    );
                }
            }

            /// Property: granting the staff flag never removes access.
            #[test]
            fn staff_access_dominates_patient_access(
                resource in any_resource(),
                action in any_action(),
                open in proptest::bool::ANY,
            ) {
                let config = PolicyConfig { open_appointment_listing: open };
                let id = IdentityId::new();
                if authorize(&Caller::known(id, false), resource, action, &config).is_ok() {
                    prop_assert!(authorize(&Caller::known(id, true), resource, action, &config).is_ok());
                }
            }

            /// Property: the deny reason is determined by credential state.
            #[test]
            fn deny_reason_matches_credential_state(
                resource in any_resource(),
                action in any_action(),
            ) {
                let config = PolicyConfig::default();
                if let Err(deny) = authorize(&Caller::Anonymous, resource, action, &config) {
                    prop_assert_eq!(deny, Deny::Unauthenticated);
                }
                let caller = Caller::known(IdentityId::new(), false);
                if let Err(deny) = authorize(&caller, resource, action, &config) {
                    prop_assert_eq!(deny, Deny::Forbidden);
                }
            }
        }
    }
}
