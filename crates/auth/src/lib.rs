//! `dentalis-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: identity
//! records, credential hashing, token claims, and the access policy table all
//! live here so the policy can be unit-tested without standing up the
//! transport layer.

pub mod caller;
pub mod capability;
pub mod claims;
pub mod credentials;
pub mod identity;
pub mod policy;

pub use caller::Caller;
pub use capability::Capability;
pub use claims::{AuthClaims, Hs256Tokens, TokenValidationError, TokenValidator, validate_claims};
pub use credentials::PasswordHash;
pub use identity::{Identity, Registration};
pub use policy::{Access, Action, Deny, PolicyConfig, Resource, authorize, required_access};
