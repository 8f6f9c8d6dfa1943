//! `POST /generate` and its `GET` info sibling

use chrono::{SecondsFormat, Utc};

use super::prelude::*;
use crate::api::ApiInfo;
use crate::constants::TEMPLATE_MIME_TYPE;
use crate::gemini::{GenerateContentRequest, Part};
use crate::storage::{ensure_template, read_base64, resolve};

/// Pulls `prompt` and `imagePath` out of the raw body.
///
/// Anything that isn't JSON is rejected before the body is looked at
/// further, missing, empty or non-string fields count as missing.
fn parse_request(body: &[u8]) -> Result<GenerationRequest, GreetingError> {
    let value: Value = serde_json::from_slice(body).map_err(|err| {
        debug!("JSON parsing error: {}", err);
        GreetingError::InvalidJson
    })?;
    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    };
    match (field("prompt"), field("imagePath")) {
        (Some(prompt), Some(image_path)) => Ok(GenerationRequest { prompt, image_path }),
        _ => Err(GreetingError::MissingFields),
    }
}

pub(crate) async fn generate_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerationResponse>, GreetingError> {
    let request = parse_request(&body)?;

    if state.config.gemini_api_key().is_empty() {
        return Err(GreetingError::MissingApiKey);
    }

    let template = resolve(&state.paths.content_root, &request.image_path);
    ensure_template(&template)
        .await
        .map_err(|source| GreetingError::TemplateCreate {
            path: request.image_path.clone(),
            source,
        })?;
    let image = read_base64(&template)
        .await
        .map_err(|source| GreetingError::TemplateRead {
            path: request.image_path.clone(),
            source,
        })?;

    let upstream =
        GenerateContentRequest::prompt_with_image(&request.prompt, TEMPLATE_MIME_TYPE, image);
    info!("Calling generation service...");
    let response = state.generator.generate_content(&upstream).await?;
    info!("Generation service call successful");

    let Some(parts) = response.first_candidate_parts() else {
        if let Some(feedback) = &response.prompt_feedback {
            error!("Prompt feedback from generation service: {}", feedback);
        }
        return Err(GreetingError::NoContent);
    };

    let mut results = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            Part::Text { text } => results.push(ResultPart::Text {
                content: text.clone(),
            }),
            Part::InlineData { inline_data } => {
                let saved = state
                    .images
                    .save(&inline_data.data, &inline_data.mime_type)
                    .await?;
                info!("Saved generated image to {}", saved.path.display());
                results.push(ResultPart::Image {
                    content: saved.public_path,
                    base64: inline_data.data.clone(),
                });
            }
            Part::Other(other) => debug!("Skipping unsupported content part: {}", other),
        }
    }

    Ok(Json(GenerationResponse::success(results)))
}

pub(crate) async fn info_handler() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Google GenAI Image Generation API".to_string(),
        methods: vec!["POST".to_string()],
        usage: "Send POST request with prompt and imagePath in body".to_string(),
        status: "API is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
