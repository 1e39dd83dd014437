use crate::captcha::CaptchaVerifier;
use crate::config::AppConfig;
use crate::ratelimit::RateLimiter;
use crate::storage::EntryBook;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub book: Arc<Mutex<EntryBook>>,
    pub limiter: Arc<Mutex<RateLimiter>>,
    pub captcha: Arc<CaptchaVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig, book: EntryBook) -> Self {
        let limiter = RateLimiter::new(config.rate_limit_window, config.rate_limit_max);
        let captcha = CaptchaVerifier::new(
            config.captcha_secret.clone(),
            config.captcha_verify_url.clone(),
            config.captcha_min_score,
        );
        Self {
            config: Arc::new(config),
            book: Arc::new(Mutex::new(book)),
            limiter: Arc::new(Mutex::new(limiter)),
            captcha: Arc::new(captcha),
        }
    }
}
