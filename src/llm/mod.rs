//! Gemini client tiers and startup-time strategy selection.
//!
//! Two structurally different client APIs cover the same service: the
//! primary tier ([`genai::GenAiClient`]) is an explicit client object whose
//! `generate` takes a model name and content per call; the legacy tier
//! ([`generative::GenerativeModel`]) binds the credential once and
//! instantiates a per-model handle whose `generate` takes only text.
//! [`ClientStrategy::select`] tries them in that fixed order.
//!
//! Selection happens once at startup. A request-time failure never re-enters
//! selection — the run is single-shot.

pub mod genai;
pub mod generative;
mod wire;

use reqwest::Url;
use thiserror::Error;

use crate::config::{ApiKey, Config};

// ── Errors ────────────────────────────────────────────────────────────────────

/// A tier constructor failed — that client shape cannot be used this run.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("invalid endpoint base {url:?}: {reason}")]
    Endpoint { url: String, reason: String },

    #[error("credential not usable for transport: {0}")]
    Credential(String),

    #[error("invalid model name {0:?}")]
    Model(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Both tiers failed to construct. Carries both reasons distinctly.
#[derive(Debug, Error)]
#[error("no usable client: primary tier failed ({primary}); legacy tier failed ({legacy})")]
pub struct StrategyUnavailable {
    pub primary: BindingError,
    pub legacy: BindingError,
}

/// A request-time failure from whichever tier was selected.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Transport never produced an HTTP response (DNS, TLS, timeout…).
    #[error("network error: {0}")]
    Network(String),

    /// The service rejected the credential.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Any other non-success status from the service (quota, bad model…).
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx body that could not be read as a text response.
    #[error("malformed response: {0}")]
    Malformed(String),
}

// ── Strategy selection ────────────────────────────────────────────────────────

/// The client acquired at startup.
#[derive(Debug, Clone)]
pub enum ClientStrategy {
    Primary(genai::GenAiClient),
    Legacy(generative::GenerativeModel),
}

/// Outcome of a successful selection: the usable strategy, plus the primary
/// tier's failure when the run fell back to legacy.
#[derive(Debug)]
pub struct Selection {
    pub strategy: ClientStrategy,
    pub primary_failure: Option<BindingError>,
}

impl ClientStrategy {
    /// Try the primary tier, then the legacy tier, in that fixed order.
    pub fn select(config: &Config, api_key: &ApiKey) -> Result<Selection, StrategyUnavailable> {
        let primary_failure = match genai::GenAiClient::new(api_key, &config.primary_base_url) {
            Ok(client) => {
                return Ok(Selection {
                    strategy: ClientStrategy::Primary(client),
                    primary_failure: None,
                });
            }
            Err(e) => e,
        };

        let legacy = generative::configure(api_key, &config.legacy_base_url)
            .and_then(|handle| generative::GenerativeModel::from_config(&handle, &config.model));
        match legacy {
            Ok(model) => Ok(Selection {
                strategy: ClientStrategy::Legacy(model),
                primary_failure: Some(primary_failure),
            }),
            Err(legacy) => Err(StrategyUnavailable {
                primary: primary_failure,
                legacy,
            }),
        }
    }

    /// Tier name for status output.
    pub fn tier(&self) -> &'static str {
        match self {
            ClientStrategy::Primary(_) => "primary",
            ClientStrategy::Legacy(_) => "legacy",
        }
    }
}

/// Validate an endpoint base shared by both tier constructors: must parse as
/// an http(s) URL. Returns the base with any trailing slash removed.
pub(crate) fn validate_base(base_url: &str) -> Result<String, BindingError> {
    let parsed = Url::parse(base_url).map_err(|e| BindingError::Endpoint {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BindingError::Endpoint {
            url: base_url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(base_url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvFile;

    fn test_config(primary_base: &str, legacy_base: &str) -> (Config, ApiKey) {
        let mut config = Config::resolve(&EnvFile::default(), |_| None);
        config.primary_base_url = primary_base.to_string();
        config.legacy_base_url = legacy_base.to_string();
        let api_key = ApiKey::new("test-key-0123456789").unwrap();
        (config, api_key)
    }

    #[test]
    fn selects_primary_when_available() {
        let (config, key) = test_config("http://127.0.0.1:9", "http://127.0.0.1:9");
        let selection = ClientStrategy::select(&config, &key).unwrap();
        assert!(matches!(selection.strategy, ClientStrategy::Primary(_)));
        assert!(selection.primary_failure.is_none());
        assert_eq!(selection.strategy.tier(), "primary");
    }

    #[test]
    fn falls_back_to_legacy_and_reports_primary_failure() {
        let (config, key) = test_config("ftp://example.com", "http://127.0.0.1:9");
        let selection = ClientStrategy::select(&config, &key).unwrap();
        assert!(matches!(selection.strategy, ClientStrategy::Legacy(_)));
        let failure = selection.primary_failure.expect("primary failure recorded");
        assert!(failure.to_string().contains("unsupported scheme"));
        assert_eq!(selection.strategy.tier(), "legacy");
    }

    #[test]
    fn both_tiers_failing_reports_both_reasons() {
        let (config, key) = test_config("not a url", "ftp://example.com");
        let err = ClientStrategy::select(&config, &key).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("primary tier failed"));
        assert!(msg.contains("legacy tier failed"));
        assert!(msg.contains("unsupported scheme"));
    }

    #[test]
    fn validate_base_trims_trailing_slash() {
        let base = validate_base("http://127.0.0.1:8080/").unwrap();
        assert_eq!(base, "http://127.0.0.1:8080");
    }

    #[test]
    fn validate_base_rejects_garbage() {
        assert!(validate_base("not a url").is_err());
        assert!(validate_base("ftp://example.com").is_err());
    }
}
