//! Wire types for the `generateContent` REST surface.
//!
//! Both client tiers speak the same JSON; only the call shape and the auth
//! channel differ. Types stay private to the `llm` tree — callers see only
//! the response text.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::GenerateError;

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

impl GenerateContentRequest {
    /// Single-turn request wrapping one text part.
    pub fn from_text(text: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn text(self) -> Result<String, GenerateError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(GenerateError::Malformed(
                "no text candidate in response".into(),
            ));
        }
        Ok(text)
    }
}

// Error envelope: {"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Consume a non-success response and map it onto the request error
/// taxonomy: 401/403 → `Auth`, anything else → `Api`.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, GenerateError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("{} [{code}]", envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => body,
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(GenerateError::Auth(message));
    }
    Err(GenerateError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> GenerateContentResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn request_serializes_to_contents_parts_text() {
        let req = GenerateContentRequest::from_text("hi");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn response_text_from_first_candidate() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"OK"}]}}]}"#;
        assert_eq!(parse(body).text().unwrap(), "OK");
    }

    #[test]
    fn multi_part_text_concatenated() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"O"},{"text":"K"}]}}]}"#;
        assert_eq!(parse(body).text().unwrap(), "OK");
    }

    #[test]
    fn later_candidates_ignored() {
        let body = r#"{"candidates":[
            {"content":{"parts":[{"text":"first"}]}},
            {"content":{"parts":[{"text":"second"}]}}
        ]}"#;
        assert_eq!(parse(body).text().unwrap(), "first");
    }

    #[test]
    fn empty_response_is_malformed() {
        assert!(matches!(
            parse("{}").text(),
            Err(GenerateError::Malformed(_))
        ));
    }

    #[test]
    fn candidate_without_text_is_malformed() {
        let body = r#"{"candidates":[{"content":{"parts":[{}]}}]}"#;
        assert!(matches!(
            parse(body).text(),
            Err(GenerateError::Malformed(_))
        ));
    }
}
