//! JSON bodies exchanged between the greeting page (or [`crate::client`]) and
//! the server.

use serde::{Deserialize, Serialize};

/// `POST /generate` body
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Full text prompt sent upstream
    pub prompt: String,
    /// Template image, relative to the server's content root
    pub image_path: String,
}

/// One entry of a successful generation, in the order the service produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResultPart {
    /// Text returned verbatim by the service
    Text {
        /// The text
        content: String,
    },
    /// An image written to the generated-output directory
    Image {
        /// Browser-servable path, eg `/generated/generated-1700000000000-abc.png`
        content: String,
        /// The image bytes as the service returned them
        base64: String,
    },
}

/// `200` body of `POST /generate`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Always true on this body
    pub success: bool,
    /// What the service produced
    pub results: Vec<ResultPart>,
    /// Human readable summary
    pub message: String,
}

impl GenerationResponse {
    /// Wraps results in the success envelope
    pub fn success(results: Vec<ResultPart>) -> Self {
        Self {
            success: true,
            results,
            message: "Content generated successfully".to_string(),
        }
    }

    /// First text entry, if any
    pub fn first_text(&self) -> Option<&str> {
        self.results.iter().find_map(|part| match part {
            ResultPart::Text { content } => Some(content.as_str()),
            ResultPart::Image { .. } => None,
        })
    }

    /// First image entry as `(public path, base64)`, if any
    pub fn first_image(&self) -> Option<(&str, &str)> {
        self.results.iter().find_map(|part| match part {
            ResultPart::Image { content, base64 } => Some((content.as_str(), base64.as_str())),
            ResultPart::Text { .. } => None,
        })
    }
}

/// Body of every `4xx`/`5xx` response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// What went wrong
    pub error: String,
    /// Underlying cause, when there's one worth showing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// `GET /generate` body
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiInfo {
    /// What this endpoint is
    pub message: String,
    /// Methods that do work
    pub methods: Vec<String>,
    /// How to call it
    pub usage: String,
    /// Always "API is running"
    pub status: String,
    /// RFC 3339 time of the response
    pub timestamp: String,
}

/// `POST /prompt` body, the raw choices from the greeting page
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    /// `morning` or `night`
    #[serde(default)]
    pub time_of_day: String,
    /// Tradition id, eg `hindu`
    #[serde(default)]
    pub religion: String,
    /// Deity id within the tradition, eg `ganesha`
    #[serde(default)]
    pub deity: String,
    /// Mood id, eg `motivational`
    #[serde(default)]
    pub quote_type: String,
    /// Optional personal message
    #[serde(default)]
    pub custom_message: String,
}

/// `POST /prompt` response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PromptResponse {
    /// The assembled prompt
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_parts_serialize_with_type_tag() {
        let parts = vec![
            ResultPart::Text {
                content: "Blessings".to_string(),
            },
            ResultPart::Image {
                content: "/generated/a.png".to_string(),
                base64: "AAEC".to_string(),
            },
        ];
        let value = serde_json::to_value(&parts).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!([
                {"type": "text", "content": "Blessings"},
                {"type": "image", "content": "/generated/a.png", "base64": "AAEC"}
            ])
        );
    }

    #[test]
    fn first_parts_skip_the_other_kind() {
        let response = GenerationResponse::success(vec![
            ResultPart::Image {
                content: "/generated/one.png".to_string(),
                base64: "AA==".to_string(),
            },
            ResultPart::Text {
                content: "first".to_string(),
            },
            ResultPart::Text {
                content: "second".to_string(),
            },
        ]);
        assert_eq!(response.first_text(), Some("first"));
        assert_eq!(response.first_image(), Some(("/generated/one.png", "AA==")));
    }

    #[test]
    fn error_body_omits_empty_details() {
        let body = ErrorBody {
            error: "nope".to_string(),
            details: None,
        };
        let text = serde_json::to_string(&body).expect("serialize");
        assert_eq!(text, r#"{"error":"nope"}"#);
    }
}
