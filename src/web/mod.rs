//! HTTP surface: the greeting page, the prompt builder and the generation
//! endpoint.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::cli::CliOptions;
use crate::config::AppConfig;
use crate::constants::GENERATED_URL_PREFIX;
use crate::error::GreetingError;
use crate::gemini::{GeminiClient, GenerationService};
use crate::storage::GeneratedImageStore;

mod generate;
mod prelude;
mod views;

/// Where things live on disk
#[derive(Clone, Debug)]
pub struct ContentPaths {
    /// `imagePath` values are joined onto this
    pub content_root: PathBuf,
    /// Public dir, generated images go in its `generated` child
    pub public_dir: PathBuf,
    /// Template image the page sends, relative to the content root
    pub template_path: String,
}

impl ContentPaths {
    /// A relative `public_dir` is taken from `content_root`.
    pub fn new(content_root: &Path, public_dir: &Path, template_path: &str) -> Self {
        Self {
            content_root: content_root.to_path_buf(),
            public_dir: content_root.join(public_dir),
            template_path: template_path.to_string(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    config: Arc<AppConfig>,
    generator: Arc<dyn GenerationService>,
    paths: Arc<ContentPaths>,
    images: GeneratedImageStore,
}

impl AppState {
    pub(crate) fn new(
        config: AppConfig,
        generator: Arc<dyn GenerationService>,
        paths: ContentPaths,
    ) -> Self {
        let images = GeneratedImageStore::new(&paths.public_dir);
        Self {
            config: Arc::new(config),
            generator,
            paths: Arc::new(paths),
            images,
        }
    }
}

pub(crate) fn create_router(state: AppState) -> Router {
    let generated = ServeDir::new(state.images.dir());
    Router::new()
        .route("/", get(views::greeting_page))
        .route("/static/styles.css", get(styles_handler))
        .route("/static/greetings.js", get(script_handler))
        .route("/prompt", post(views::prompt_handler))
        .route(
            "/generate",
            get(generate::info_handler).post(generate::generate_handler),
        )
        .nest_service(GENERATED_URL_PREFIX, generated)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    GreetingError::InternalServerError("Unexpected error".to_string()).into_response()
}

async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

async fn script_handler() -> impl IntoResponse {
    const SCRIPT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/greetings.js"));
    ([(CONTENT_TYPE, "text/javascript")], SCRIPT)
}

/// Builds the Gemini client and serves until the listener fails.
pub async fn setup_server(cli: &CliOptions, config: AppConfig) -> Result<(), anyhow::Error> {
    let generator = GeminiClient::new(config.gemini_api_key(), &cli.model)
        .with_base_url(&cli.gemini_base_url);
    info!(
        "Using model {} ({} mode)",
        generator.model(),
        if config.is_production() {
            "production"
        } else {
            "development"
        }
    );
    let paths = ContentPaths::new(&cli.content_root, &cli.public_dir, &cli.template_path);
    let app = create_router(AppState::new(config, Arc::new(generator), paths));

    let addr = format!("{}:{}", cli.listen_address, cli.port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use http_body_util::BodyExt;

    use super::*;
    use crate::gemini::{GenerateContentRequest, GenerateContentResponse, UpstreamError};

    /// Canned upstream that records what it was sent.
    pub(crate) struct StubGenerator {
        response: serde_json::Value,
        fail: bool,
        calls: AtomicUsize,
        requests: Mutex<Vec<serde_json::Value>>,
    }

    impl StubGenerator {
        pub(crate) fn responding(response: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                response,
                fail: false,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: serde_json::Value::Null,
                fail: true,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_request(&self) -> Option<serde_json::Value> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl GenerationService for StubGenerator {
        async fn generate_content(
            &self,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .unwrap()
                .push(serde_json::to_value(request).unwrap());
            if self.fail {
                return Err(UpstreamError::Status {
                    status: 503,
                    body: "model overloaded".to_string(),
                });
            }
            serde_json::from_value(self.response.clone())
                .map_err(|err| UpstreamError::Decode(err.to_string()))
        }
    }

    pub(crate) fn test_config(gemini_api_key: &str) -> AppConfig {
        AppConfig {
            gemini_api_key: gemini_api_key.to_string(),
            hugging_face_api_key: "hf_test".to_string(),
            openai_api_key: String::new(),
            stability_api_key: String::new(),
            mode: crate::config::RuntimeMode::Development,
        }
    }

    pub(crate) fn test_router(
        root: &Path,
        config: AppConfig,
        generator: Arc<dyn GenerationService>,
    ) -> Router {
        let paths = ContentPaths::new(
            root,
            Path::new("public"),
            crate::constants::DEFAULT_TEMPLATE_PATH,
        );
        create_router(AppState::new(config, generator, paths))
    }

    pub(crate) async fn read_body(response: Response<Body>) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        String::from_utf8_lossy(&bytes).to_string()
    }
}
