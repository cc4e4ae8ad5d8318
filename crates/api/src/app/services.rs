//! Shared request-handling state.

use std::sync::Arc;

use chrono::Duration;

use dentalis_auth::{Hs256Tokens, PolicyConfig};
use dentalis_store::ClinicStore;

use crate::Config;

/// Everything handlers need, injected as one `Extension<Arc<AppServices>>`.
pub struct AppServices {
    pub store: Arc<dyn ClinicStore>,
    pub tokens: Hs256Tokens,
    pub policy: PolicyConfig,
    pub token_ttl: Duration,
    pub session_ttl: Duration,
}

impl AppServices {
    pub fn new(config: &Config, store: Arc<dyn ClinicStore>) -> Self {
        Self {
            store,
            tokens: Hs256Tokens::new(config.jwt_secret.as_bytes()),
            policy: config.policy,
            token_ttl: Duration::minutes(config.token_ttl_minutes),
            session_ttl: Duration::hours(config.session_ttl_hours),
        }
    }
}
