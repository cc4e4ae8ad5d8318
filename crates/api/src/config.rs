//! Runtime configuration, read once from the environment at startup.

use dentalis_auth::PolicyConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// HS256 secret for patient bearer tokens.
    pub jwt_secret: String,

    /// Bearer token lifetime in minutes.
    pub token_ttl_minutes: i64,

    /// Staff session lifetime in hours.
    pub session_ttl_hours: i64,

    /// Policy knobs (see `dentalis-auth::PolicyConfig`).
    pub policy: PolicyConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let token_ttl_minutes = env_i64("TOKEN_TTL_MINUTES", 60);
        let session_ttl_hours = env_i64("SESSION_TTL_HOURS", 8);

        let open_appointment_listing = std::env::var("OPEN_APPOINTMENT_LISTING")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if open_appointment_listing {
            tracing::warn!("OPEN_APPOINTMENT_LISTING enabled; appointment reads are unauthenticated");
        }

        Self {
            jwt_secret,
            token_ttl_minutes,
            session_ttl_hours,
            policy: PolicyConfig {
                open_appointment_listing,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret".to_string(),
            token_ttl_minutes: 60,
            session_ttl_hours: 8,
            policy: PolicyConfig::default(),
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
