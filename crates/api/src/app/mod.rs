//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: shared state handed to handlers (store, token codec,
//!   policy configuration)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON response shaping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use dentalis_store::ClinicStore;

use crate::{Config, middleware};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub async fn build_app(config: Config, store: Arc<dyn ClinicStore>) -> Router {
    let services = Arc::new(services::AppServices::new(&config, store));
    let auth_state = middleware::AuthState {
        services: services.clone(),
    };

    Router::new()
        .route("/", get(routes::system::home))
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(services))
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::resolve_caller,
                )),
        )
}
