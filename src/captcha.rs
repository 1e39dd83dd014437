//! reCAPTCHA-style token verification for the public submission form.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

#[derive(Debug)]
pub enum CaptchaError {
    Network(String),
    Rejected(Vec<String>),
    LowScore(f64),
}

impl fmt::Display for CaptchaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(err) => write!(f, "captcha verification failed: {err}"),
            Self::Rejected(codes) => {
                write!(f, "captcha rejected: {}", codes.join(", "))
            }
            Self::LowScore(score) => write!(f, "captcha score {score} below threshold"),
        }
    }
}

impl std::error::Error for CaptchaError {}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifies submission tokens against the configured endpoint. With no
/// secret configured (local/dev) every token passes.
#[derive(Debug, Clone)]
pub struct CaptchaVerifier {
    client: reqwest::Client,
    secret: Option<String>,
    verify_url: String,
    min_score: f64,
}

impl CaptchaVerifier {
    pub fn new(secret: Option<String>, verify_url: String, min_score: f64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            secret,
            verify_url,
            min_score,
        }
    }

    pub fn enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub async fn verify(&self, token: &str) -> Result<(), CaptchaError> {
        let Some(secret) = &self.secret else {
            return Ok(());
        };
        if token.is_empty() {
            return Err(CaptchaError::Rejected(vec!["missing-input-response".into()]));
        }

        let response: VerifyResponse = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|err| CaptchaError::Network(err.to_string()))?
            .json()
            .await
            .map_err(|err| CaptchaError::Network(err.to_string()))?;

        if !response.error_codes.is_empty() {
            warn!("captcha error codes: {}", response.error_codes.join(", "));
            return Err(CaptchaError::Rejected(response.error_codes));
        }
        if !response.success {
            return Err(CaptchaError::Rejected(vec!["not-successful".into()]));
        }
        let score = response.score.unwrap_or(0.0);
        if score < self.min_score {
            return Err(CaptchaError::LowScore(score));
        }
        info!("captcha passed with score {score}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_verifier_accepts_anything() {
        let verifier =
            CaptchaVerifier::new(None, DEFAULT_VERIFY_URL.to_string(), DEFAULT_MIN_SCORE);
        assert!(!verifier.enabled());
        assert!(verifier.verify("").await.is_ok());
        assert!(verifier.verify("whatever").await.is_ok());
    }

    #[tokio::test]
    async fn enabled_verifier_rejects_empty_token_without_network() {
        let verifier = CaptchaVerifier::new(
            Some("secret".into()),
            DEFAULT_VERIFY_URL.to_string(),
            DEFAULT_MIN_SCORE,
        );
        assert!(verifier.enabled());
        assert!(matches!(
            verifier.verify("").await,
            Err(CaptchaError::Rejected(_))
        ));
    }
}
