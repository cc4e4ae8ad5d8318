use axum::{Router, routing::get};

pub mod appointments;
pub mod auth;
pub mod blog;
pub mod common;
pub mod faq;
pub mod history;
pub mod patients;
pub mod prescriptions;
pub mod profile;
pub mod reviews;
pub mod system;

/// Router for all resource endpoints (the policy table decides access per
/// handler; nothing here is pre-gated).
pub fn router() -> Router {
    Router::new()
        .route("/me", get(profile::me))
        .nest("/auth", auth::router())
        .nest("/patients", patients::router())
        .nest("/history", history::router())
        .nest("/prescriptions", prescriptions::router())
        .nest("/appointments", appointments::router())
        .nest("/reviews", reviews::router())
        .nest("/faq", faq::router())
        .nest("/blog", blog::router())
}
