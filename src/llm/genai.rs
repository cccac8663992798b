//! Primary-tier Gemini client: explicit client object, header auth.
//!
//! Construct once with the credential, then `generate(model, contents)` per
//! call. The credential is installed as a sensitive default header at
//! construction, so request code never touches the raw key.

use std::time::Duration;

use reqwest::{Client, header};
use tracing::{debug, error};

use crate::config::ApiKey;
use crate::llm::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::llm::{BindingError, GenerateError, validate_base, wire};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GenAiClient {
    client: Client,
    base_url: String,
}

impl GenAiClient {
    /// Build the client. Fails if the endpoint base does not parse as an
    /// http(s) URL, the credential cannot travel as a header value, or the
    /// HTTP client cannot be built.
    pub fn new(api_key: &ApiKey, base_url: &str) -> Result<Self, BindingError> {
        let base_url = validate_base(base_url)?;

        let mut key_value = header::HeaderValue::from_str(api_key.as_str())
            .map_err(|e| BindingError::Credential(e.to_string()))?;
        key_value.set_sensitive(true);
        let mut headers = header::HeaderMap::new();
        headers.insert("x-goog-api-key", key_value);

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| BindingError::Client(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// One `generateContent` round-trip: send `contents` to `model` and
    /// return the response text.
    pub async fn generate(&self, model: &str, contents: &str) -> Result<String, GenerateError> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);
        let payload = GenerateContentRequest::from_text(contents);

        debug!(%model, content_len = contents.len(), "sending generateContent request");

        let response = self
            .client
            .post(&url)
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
