//! Profile-linking rule.
//!
//! Every non-staff identity gets exactly one patient profile, created
//! reactively. This is an explicit post-commit hook: the registration code
//! path calls it after the identity insert has committed, so a failure here
//! never rolls the identity back (that partial success is the accepted
//! semantics, reported as an internal error by the caller).

use chrono::{DateTime, Utc};

use dentalis_auth::Identity;
use dentalis_patients::Patient;

use crate::error::{StoreError, StoreResult};
use crate::traits::PatientStore;

/// Ensure the identity has its linked patient profile.
///
/// - staff identity → no profile, returns `None`;
/// - already linked → returns the existing profile (idempotent re-save);
/// - otherwise → creates exactly one profile and returns it.
pub async fn ensure_patient_profile<S>(
    store: &S,
    identity: &Identity,
    now: DateTime<Utc>,
) -> StoreResult<Option<Patient>>
where
    S: PatientStore + ?Sized,
{
    if identity.is_staff {
        return Ok(None);
    }

    if let Some(existing) = store.patient_by_identity(identity.id).await? {
        return Ok(Some(existing));
    }

    let patient = Patient::for_identity(identity.id, now);
    match store.insert_patient(&patient).await {
        Ok(()) => {
            tracing::info!(identity_id = %identity.id, patient_id = %patient.id, "linked patient profile created");
            Ok(Some(patient))
        }
        // Lost a race against a concurrent save of the same identity: the
        // profile exists now, which is all this hook guarantees.
        Err(StoreError::Conflict(_)) => store.patient_by_identity(identity.id).await,
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;
    use crate::traits::IdentityStore;
    use dentalis_auth::PasswordHash;
    use dentalis_core::IdentityId;

    async fn committed_identity(store: &InMemoryStore, username: &str, staff: bool) -> Identity {
        let identity = Identity {
            id: IdentityId::new(),
            username: username.to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: staff,
            created_at: Utc::now(),
        };
        store
            .insert_identity(&identity, &PasswordHash::derive("pw123456"))
            .await
            .unwrap();
        identity
    }

    #[tokio::test]
    async fn non_staff_identity_gets_exactly_one_profile() {
        let store = InMemoryStore::new();
        let identity = committed_identity(&store, "kiah", false).await;

        let created = ensure_patient_profile(&store, &identity, Utc::now())
            .await
            .unwrap()
            .expect("profile expected");
        assert_eq!(created.identity, identity.id);

        let listed = store.list_patients().await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn staff_identity_gets_no_profile() {
        let store = InMemoryStore::new();
        let identity = committed_identity(&store, "drsmith", true).await;

        let linked = ensure_patient_profile(&store, &identity, Utc::now())
            .await
            .unwrap();
        assert!(linked.is_none());
        assert!(store.list_patients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn re_save_is_idempotent() {
        let store = InMemoryStore::new();
        let identity = committed_identity(&store, "kiah", false).await;

        let first = ensure_patient_profile(&store, &identity, Utc::now())
            .await
            .unwrap()
            .unwrap();
        let second = ensure_patient_profile(&store, &identity, Utc::now())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.list_patients().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn hook_failure_leaves_identity_committed() {
        let store = InMemoryStore::new();
        // Identity never committed: the FK check makes the hook fail.
        let identity = Identity {
            id: IdentityId::new(),
            username: "ghost".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            created_at: Utc::now(),
        };

        let result = ensure_patient_profile(&store, &identity, Utc::now()).await;
        assert!(matches!(result, Err(StoreError::InvalidReference(_))));
    }
}
