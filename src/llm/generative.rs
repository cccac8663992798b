//! Legacy-tier Gemini client: configured handle + per-model instances.
//!
//! Mirrors the older SDK generation: [`configure`] binds the credential
//! once, [`GenerativeModel::from_config`] instantiates a handle for one
//! model, and `generate(text)` takes only the prompt. Auth travels as a
//! `?key=` query parameter instead of a header.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error};

use crate::config::ApiKey;
use crate::llm::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::llm::{BindingError, GenerateError, validate_base, wire};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Credential + endpoint bound once, shared by every model handle created
/// from it.
#[derive(Debug, Clone)]
pub struct GenerativeConfig {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

/// Bind the credential to the legacy REST surface.
pub fn configure(api_key: &ApiKey, base_url: &str) -> Result<GenerativeConfig, BindingError> {
    let base_url = validate_base(base_url)?;
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| BindingError::Client(e.to_string()))?;
    Ok(GenerativeConfig {
        client,
        base_url,
        api_key: api_key.clone(),
    })
}

/// A handle bound to one model; the credential and endpoint come from the
/// configuration it was instantiated from.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    config: GenerativeConfig,
    model: String,
}

impl GenerativeModel {
    /// Instantiate a handle for `model`. The name must be non-empty and
    /// must not contain characters that would escape the URL path.
    pub fn from_config(config: &GenerativeConfig, model: &str) -> Result<Self, BindingError> {
        if model.is_empty() || model.contains(['/', '?', '#', ' ']) {
            return Err(BindingError::Model(model.to_string()));
        }
        Ok(Self {
            config: config.clone(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One round-trip with the prompt text; model and credential were fixed
    /// at instantiation.
    pub async fn generate(&self, text: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.model
        );
        let payload = GenerateContentRequest::from_text(text);

        debug!(model = %self.model, content_len = text.len(), "sending legacy generateContent request");

        let response = self
            .config
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "request failed before an HTTP response");
                GenerateError::Network(e.to_string())
            })?;

        let response = wire::check_status(response).await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Malformed(format!("undecodable body: {e}")))?;

        parsed.text()
    }
}
