//! Process configuration — read once from the environment at startup,
//! immutable afterwards. No ambient globals: the resulting `AppConfig`
//! is passed by `Arc` into the router state.

use std::env;
use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "MediBook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PORT: u16 = 5000;
const DEV_SECRET_KEY: &str = "temporary_key_for_development";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "medibook=info,axum=warn"
}

/// Process-wide configuration. Table names and region describe the managed
/// document-store deployment; the in-memory reference store ignores them.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Key for signing session cookies. Falls back to a development key
    /// when SECRET_KEY is unset.
    pub secret_key: String,
    pub enable_email: bool,
    pub enable_sns: bool,
    pub sns_topic: Option<String>,
    pub users_table: String,
    pub appointments_table: String,
    pub region: String,
}

impl AppConfig {
    /// Build the configuration from process environment variables,
    /// applying the documented defaults for anything unset.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let secret_key = match env::var("SECRET_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                tracing::warn!("SECRET_KEY not set, using development key");
                DEV_SECRET_KEY.to_string()
            }
        };

        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            secret_key,
            enable_email: parse_flag(env::var("ENABLE_EMAIL").ok()),
            enable_sns: parse_flag(env::var("ENABLE_SNS").ok()),
            sns_topic: env::var("SNS_TOPIC_ARN").ok().filter(|t| !t.is_empty()),
            users_table: env::var("USERS_TABLE_NAME")
                .unwrap_or_else(|_| "UsersTable".to_string()),
            appointments_table: env::var("APPOINTMENTS_TABLE_NAME")
                .unwrap_or_else(|_| "AppointmentsTable".to_string()),
            region: env::var("AWS_REGION_NAME")
                .unwrap_or_else(|_| "ap-south-1".to_string()),
        }
    }
}

/// Feature flags are the string "true" (case-insensitive); anything else,
/// including absence, is off.
fn parse_flag(value: Option<String>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parses_true_case_insensitive() {
        assert!(parse_flag(Some("true".into())));
        assert!(parse_flag(Some("True".into())));
        assert!(parse_flag(Some(" TRUE ".into())));
    }

    #[test]
    fn flag_defaults_off() {
        assert!(!parse_flag(None));
        assert!(!parse_flag(Some("false".into())));
        assert!(!parse_flag(Some("1".into())));
        assert!(!parse_flag(Some("".into())));
    }

    #[test]
    fn app_name_is_medibook() {
        assert_eq!(APP_NAME, "MediBook");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
