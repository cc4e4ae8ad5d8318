//! `dentalis-store` — persistence boundary.
//!
//! Repository traits with two implementations: Postgres (sqlx) for
//! production and an in-memory store for tests and local development. The
//! profile-linking post-commit hook and the staff session store live here
//! too, since both are storage concerns.

pub mod error;
pub mod in_memory;
pub mod postgres;
pub mod profile_link;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use in_memory::InMemoryStore;
pub use postgres::PgStore;
pub use profile_link::ensure_patient_profile;
pub use traits::{
    AppointmentStore, ClinicStore, ContentStore, IdentityStore, PatientStore, ReviewStore,
    SessionStore,
};
