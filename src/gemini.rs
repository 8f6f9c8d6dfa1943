//! Gemini `generateContent` client and the payload types it speaks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::constants::DEFAULT_GEMINI_BASE_URL;

/// Content container used in both requests and responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// `user` / `model`, omitted on requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered parts, missing on some blocked responses
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part.
///
/// Variant order matters for `#[serde(untagged)]` decoding, anything that's
/// neither text nor inline data (function calls, file references, ...) lands
/// in `Other` instead of failing the whole response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// A text fragment
    Text {
        /// The text
        text: String,
    },
    /// Base64 media
    InlineData {
        /// The payload
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// Something we don't handle
    Other(serde_json::Value),
}

/// Base64 inline payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// eg `image/png`
    pub mime_type: String,
    /// Base64 bytes
    pub data: String,
}

/// Request body for `generateContent`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// The conversation, here always a single user turn
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// A prompt plus one inline image, in that order.
    pub fn prompt_with_image(prompt: &str, mime_type: &str, image_base64: String) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: image_base64,
                        },
                    },
                ],
            }],
        }
    }
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Alternatives, usually one
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt was blocked
    #[serde(default)]
    pub prompt_feedback: Option<serde_json::Value>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, `None` when there's nothing to consume.
    pub fn first_candidate_parts(&self) -> Option<&[Part]> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .filter(|parts| !parts.is_empty())
    }
}

/// Candidate completion item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Missing when the candidate was filtered
    #[serde(default)]
    pub content: Option<Content>,
    /// eg `STOP`, `SAFETY`
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Failures talking to the generation service
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Couldn't reach it, or the connection broke
    #[error("Request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// It answered with a non-2xx status
    #[error("Generation service error (status {status}): {body}")]
    Status {
        /// HTTP status
        status: u16,
        /// Response body as text
        body: String,
    },
    /// It answered 2xx with something we can't read
    #[error("Failed to parse generation service response: {0}")]
    Decode(String),
}

/// Something that can turn a prompt and an image into content parts.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// One blocking round trip, no retries.
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, UpstreamError>;
}

/// Gemini REST client
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// `model` is the bare model ID, a `models/` prefix is stripped.
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    /// As [`GeminiClient::new`] with a caller-built HTTP client
    pub fn new_with_client(api_key: &str, model: &str, client: reqwest::Client) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(model).to_string();
        Self {
            client,
            api_key: api_key.to_string(),
            model,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    /// Points the client somewhere other than Google
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// The configured model ID
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, UpstreamError> {
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                error!("Failed to send request to Gemini: {}", err);
                err
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Gemini API error (status {}): {}", status, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|err| {
            error!("Failed to parse Gemini response: {}\nBody: {}", err, body);
            UpstreamError::Decode(err.to_string())
        })?;
        debug!(
            "Gemini returned {} candidate(s) from {}",
            parsed.candidates.len(),
            self.model
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gemini-2.5-flash-image-preview";
    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-image-preview:generateContent";

    fn make_client(server: &MockServer) -> GeminiClient {
        GeminiClient::new("key", MODEL).with_base_url(&server.uri())
    }

    #[test]
    fn request_serializes_text_then_inline_image() {
        let request = GenerateContentRequest::prompt_with_image("hello", "image/png", "AAAA".into());
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "contents": [{
                    "parts": [
                        {"text": "hello"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn response_decodes_defensively() {
        let parsed: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "a blessing"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                        {"functionCall": {"name": "noop"}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }))
        .expect("decode");
        let parts = parsed.first_candidate_parts().expect("parts");
        assert!(matches!(&parts[0], Part::Text { text } if text == "a blessing"));
        assert!(matches!(&parts[1], Part::InlineData { inline_data } if inline_data.data == "AAAA"));
        assert!(matches!(&parts[2], Part::Other(_)));

        let empty: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).expect("decode empty");
        assert!(empty.first_candidate_parts().is_none());

        let no_content: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .expect("decode filtered");
        assert!(no_content.first_candidate_parts().is_none());
    }

    #[test]
    fn models_prefix_is_stripped() {
        let client = GeminiClient::new("key", "models/gemini-pro");
        assert_eq!(client.model(), "gemini-pro");
    }

    #[tokio::test]
    async fn posts_prompt_and_image_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [{"text": "prompt"}, {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = GenerateContentRequest::prompt_with_image("prompt", "image/png", "AAAA".into());
        let response = make_client(&server)
            .generate_content(&request)
            .await
            .expect("generate");
        assert_eq!(response.candidates.len(), 1);
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let request = GenerateContentRequest::prompt_with_image("prompt", "image/png", "AAAA".into());
        let err = make_client(&server)
            .generate_content(&request)
            .await
            .expect_err("should fail");
        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let request = GenerateContentRequest::prompt_with_image("prompt", "image/png", "AAAA".into());
        let err = make_client(&server)
            .generate_content(&request)
            .await
            .expect_err("should fail");
        assert!(matches!(err, UpstreamError::Decode(_)));
    }
}
