//! Talks to a running server the same way the greeting page does: build the
//! prompt, post it with the template path, then keep the first image and
//! note.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::api::{GenerationRequest, GenerationResponse};
use crate::constants::DEFAULT_TEMPLATE_PATH;
use crate::greeting::{GreetingSelection, TimeOfDay, build_prompt};

/// Ways a generation round trip can fail
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server could not be reached at all
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
    /// A 2xx answer that was not JSON
    #[error("API returned non-JSON response: {0}")]
    NonJson(String),
    /// Claimed to be JSON but did not parse
    #[error("Invalid JSON from API: {0}")]
    InvalidJson(String),
    /// Non-2xx status
    #[error("API Error: {status} - {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
    /// The server answered but did not report success
    #[error("{0}")]
    Service(String),
    /// Bad server base URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Writing a download failed
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
    /// The image payload was not valid base64
    #[error("Failed to decode image: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl ClientError {
    /// What the page would tell the user
    pub fn alert_message(&self) -> String {
        match self {
            ClientError::Network(_) => {
                "Network error: Please check if your API server is running.".to_string()
            }
            ClientError::InvalidJson(_) => {
                "API returned invalid JSON. Check server logs for details.".to_string()
            }
            ClientError::Service(message) => format!("Error generating image: {}", message),
            other => format!("Failed to generate image: {}", other),
        }
    }
}

/// An image the server generated and saved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Public path on the server, e.g. `/generated/generated-...png`
    pub url: String,
    /// Raw image bytes, base64 encoded
    pub base64: String,
}

/// The parts of a response the page shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GreetingOutcome {
    /// First image part
    pub image: Option<GeneratedImage>,
    /// First text part
    pub text: Option<String>,
}

impl GreetingOutcome {
    fn from_response(response: &GenerationResponse) -> Self {
        Self {
            image: response
                .first_image()
                .map(|(url, base64)| GeneratedImage {
                    url: url.to_string(),
                    base64: base64.to_string(),
                }),
            text: response.first_text().map(str::to_string),
        }
    }

    /// The apology note only shows up when the model sent text back
    pub fn shows_note(&self) -> bool {
        self.text.is_some()
    }
}

/// Somewhere a finished greeting can be handed off to
pub trait ShareTarget: Send + Sync {
    /// Share an absolute image URL
    fn share(&self, url: &Url) -> Result<(), ClientError>;
}

/// Sharing is unavailable, does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoShare;

impl ShareTarget for NoShare {
    fn share(&self, url: &Url) -> Result<(), ClientError> {
        debug!("Sharing unavailable, ignoring {}", url);
        Ok(())
    }
}

/// HTTP client for the greeting server
pub struct GreetingClient {
    client: reqwest::Client,
    base_url: Url,
    template_path: String,
    share_target: Box<dyn ShareTarget>,
}

impl GreetingClient {
    /// Client for the server at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
            template_path: DEFAULT_TEMPLATE_PATH.to_string(),
            share_target: Box::new(NoShare),
        })
    }

    /// Send a different template image path
    pub fn with_template_path(mut self, template_path: &str) -> Self {
        self.template_path = template_path.to_string();
        self
    }

    /// Use `target` when sharing
    pub fn with_share(mut self, target: Box<dyn ShareTarget>) -> Self {
        self.share_target = target;
        self
    }

    /// Builds the prompt for `selection` and asks the server for an image.
    pub async fn generate(
        &self,
        selection: &GreetingSelection,
    ) -> Result<GreetingOutcome, ClientError> {
        let request = GenerationRequest {
            prompt: build_prompt(selection),
            image_path: self.template_path.clone(),
        };
        let url = self.base_url.join("/generate")?;
        info!(
            "Requesting {} {} greeting from {}",
            selection.time_of_day, selection.deity.label, url
        );

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                error!("Failed to reach greeting server: {}", err);
                ClientError::Network(err)
            })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        let body = response.text().await.map_err(ClientError::Network)?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        if !is_json {
            return Err(ClientError::NonJson(body));
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|err| ClientError::InvalidJson(err.to_string()))?;
        if value.get("success").and_then(Value::as_bool) != Some(true) {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            return Err(ClientError::Service(message.to_string()));
        }
        let parsed: GenerationResponse = serde_json::from_value(value)
            .map_err(|err| ClientError::InvalidJson(err.to_string()))?;

        Ok(GreetingOutcome::from_response(&parsed))
    }

    /// Writes the image to `<dir>/<time>-blessing-<millis>.png`. Nothing to
    /// write gives `None`.
    pub async fn download(
        &self,
        outcome: &GreetingOutcome,
        time_of_day: TimeOfDay,
        dir: &Path,
    ) -> Result<Option<PathBuf>, ClientError> {
        let Some(image) = &outcome.image else {
            return Ok(None);
        };
        let bytes = general_purpose::STANDARD.decode(&image.base64)?;
        let path = dir.join(download_filename(
            time_of_day,
            chrono::Utc::now().timestamp_millis(),
        ));
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, bytes).await?;
        info!("Saved greeting to {}", path.display());
        Ok(Some(path))
    }

    /// Hands the absolute image URL to the share target, if there is an image.
    pub fn share(&self, outcome: &GreetingOutcome) -> Result<Option<Url>, ClientError> {
        let Some(image) = &outcome.image else {
            return Ok(None);
        };
        let url = self.base_url.join(&image.url)?;
        self.share_target.share(&url)?;
        Ok(Some(url))
    }
}

fn download_filename(time_of_day: TimeOfDay, millis: i64) -> String {
    format!("{}-blessing-{}.png", time_of_day.id(), millis)
}
