pub(crate) use crate::api::{GenerationRequest, GenerationResponse, ResultPart};
pub(crate) use crate::error::GreetingError;
pub(crate) use crate::web::AppState;
pub(crate) use askama::Template;
pub(crate) use askama_web::WebTemplate;
pub(crate) use axum::Json;
pub(crate) use axum::body::Bytes;
pub(crate) use axum::extract::State;
pub(crate) use serde_json::Value;
pub(crate) use tracing::{debug, error, info};
