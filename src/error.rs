//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, info};

use crate::api::ErrorBody;
use crate::gemini::UpstreamError;
use crate::greeting::SelectionError;
use crate::storage::SaveError;

/// Everything a request can fail with, and the status it maps to.
#[derive(Debug, thiserror::Error)]
pub enum GreetingError {
    /// Body isn't JSON
    #[error("Invalid JSON in request body")]
    InvalidJson,
    /// `prompt` or `imagePath` is absent, empty or not a string
    #[error("Missing required fields: prompt and imagePath")]
    MissingFields,
    /// The greeting choices don't make a valid selection
    #[error("{0}")]
    Selection(#[from] SelectionError),
    /// The generation key is empty
    #[error("API key not configured. Please check server configuration.")]
    MissingApiKey,
    /// Couldn't write the placeholder template, reported like any other
    /// unexpected failure
    #[error("Internal server error")]
    TemplateCreate {
        /// As the caller sent it
        path: String,
        /// Why
        source: std::io::Error,
    },
    /// Couldn't read the template
    #[error("Failed to read image file at {path}")]
    TemplateRead {
        /// As the caller sent it
        path: String,
        /// Why
        source: std::io::Error,
    },
    /// The generation service call failed
    #[error("Failed to generate content with AI service")]
    Upstream(#[from] UpstreamError),
    /// The service answered without any candidate content
    #[error("No content generated by AI service")]
    NoContent,
    /// A generated image couldn't be decoded or written
    #[error("Failed to save generated image")]
    SaveImage(#[from] SaveError),
    /// Anything else
    #[error("Internal server error")]
    InternalServerError(String),
}

impl GreetingError {
    /// The HTTP status for this failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            GreetingError::InvalidJson
            | GreetingError::MissingFields
            | GreetingError::Selection(_)
            | GreetingError::TemplateRead { .. } => StatusCode::BAD_REQUEST,
            GreetingError::MissingApiKey
            | GreetingError::TemplateCreate { .. }
            | GreetingError::Upstream(_)
            | GreetingError::NoContent
            | GreetingError::SaveImage(_)
            | GreetingError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Extra detail shown to the caller, only for upstream and unexpected failures
    fn details(&self) -> Option<String> {
        match self {
            GreetingError::Upstream(err) => Some(err.to_string()),
            GreetingError::TemplateCreate { source, .. } => Some(source.to_string()),
            GreetingError::InternalServerError(message) => Some(message.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for GreetingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            GreetingError::InvalidJson
            | GreetingError::MissingFields
            | GreetingError::Selection(_) => {
                info!("Bad request received: {}", self);
            }
            GreetingError::TemplateCreate { path, source } => {
                error!("Failed to write placeholder template at {}: {}", path, source);
            }
            GreetingError::TemplateRead { path, source } => {
                error!("{}: {}", self, source);
            }
            GreetingError::Upstream(err) => {
                error!("Error calling generation service: {}", err);
            }
            GreetingError::SaveImage(err) => {
                error!("Error saving generated image: {}", err);
            }
            GreetingError::InternalServerError(message) => {
                error!("Internal server error: {}", message);
            }
            GreetingError::MissingApiKey | GreetingError::NoContent => {
                error!("{}", self);
            }
        }

        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}
