use crate::captcha;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Runtime configuration, read once from the environment at startup and
/// carried in [`crate::state::AppState`]. No global singletons.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    /// Shared secret gating the /mod routes; empty disables moderation.
    pub mod_token: String,
    pub captcha_secret: Option<String>,
    /// Public site key embedded in the submission form when captcha is on.
    pub captcha_site_key: Option<String>,
    pub captcha_verify_url: String,
    pub captcha_min_score: f64,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mod_token = env::var("MOD_TOKEN").unwrap_or_default();
        if mod_token.is_empty() {
            warn!("MOD_TOKEN not set, moderation routes are disabled");
        }
        let captcha_secret = env::var("CAPTCHA_SECRET").ok().filter(|s| !s.is_empty());
        if captcha_secret.is_none() {
            warn!("CAPTCHA_SECRET not set, accepting submissions without verification");
        }

        Self {
            port: parse_env("PORT", 8080),
            data_path: env::var("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/entries.json")),
            mod_token,
            captcha_secret,
            captcha_site_key: env::var("CAPTCHA_SITE_KEY").ok().filter(|s| !s.is_empty()),
            captcha_verify_url: env::var("CAPTCHA_VERIFY_URL")
                .unwrap_or_else(|_| captcha::DEFAULT_VERIFY_URL.to_string()),
            captcha_min_score: parse_env("CAPTCHA_MIN_SCORE", captcha::DEFAULT_MIN_SCORE),
            rate_limit_max: parse_env("RATE_LIMIT_MAX", 3),
            rate_limit_window: Duration::from_secs(parse_env("RATE_LIMIT_WINDOW_SECS", 3600)),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
