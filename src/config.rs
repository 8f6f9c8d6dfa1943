//! Config handling

use std::fmt;

use tracing::log::LevelFilter;
use tracing::warn;

use crate::constants::HUGGING_FACE_TOKEN_PREFIX;

/// Name of the Gemini credential
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Name of the Hugging Face credential
pub const HUGGING_FACE_API_KEY: &str = "HUGGING_FACE_API_KEY";
/// Name of the optional OpenAI credential
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Name of the optional Stability credential
pub const STABILITY_API_KEY: &str = "STABILITY_API_KEY";
/// Runtime mode flag, `production` or anything else
pub const APP_ENV: &str = "APP_ENV";

const REQUIRED: [&str; 2] = [GEMINI_API_KEY, HUGGING_FACE_API_KEY];

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Errors raised while loading the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One or more mandatory variables are absent or empty
    #[error(
        "Missing required environment variables: {}\n\
         Please check your .env file or deployment configuration.\n\n\
         Required variables:\n\
         - GEMINI_API_KEY: Get from https://aistudio.google.com/app/apikey\n\
         - HUGGING_FACE_API_KEY: Get from https://huggingface.co/settings/tokens (starts with 'hf_')",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),
}

/// Whether we're running for real
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeMode {
    /// Anything that isn't production
    Development,
    /// `APP_ENV=production`
    Production,
}

/// Credentials and runtime mode, loaded once at start-up and never mutated.
#[derive(Clone)]
pub struct AppConfig {
    pub(crate) gemini_api_key: String,
    pub(crate) hugging_face_api_key: String,
    pub(crate) openai_api_key: String,
    pub(crate) stability_api_key: String,
    pub(crate) mode: RuntimeMode,
}

impl AppConfig {
    /// Loads the config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the config through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let missing: Vec<&'static str> = REQUIRED
            .into_iter()
            .filter(|key| read(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let gemini_api_key = read(GEMINI_API_KEY).unwrap_or_default();
        let hugging_face_api_key = read(HUGGING_FACE_API_KEY).unwrap_or_default();
        check_hugging_face_token(&hugging_face_api_key);

        let mode = match read(APP_ENV).as_deref() {
            Some("production") => RuntimeMode::Production,
            _ => RuntimeMode::Development,
        };

        Ok(Self {
            gemini_api_key,
            hugging_face_api_key,
            openai_api_key: read(OPENAI_API_KEY).unwrap_or_default(),
            stability_api_key: read(STABILITY_API_KEY).unwrap_or_default(),
            mode,
        })
    }

    /// Key for the generation service
    pub fn gemini_api_key(&self) -> &str {
        &self.gemini_api_key
    }

    /// Key for the secondary service
    pub fn hugging_face_api_key(&self) -> &str {
        &self.hugging_face_api_key
    }

    /// Optional, empty when unset
    pub fn openai_api_key(&self) -> &str {
        &self.openai_api_key
    }

    /// Optional, empty when unset
    pub fn stability_api_key(&self) -> &str {
        &self.stability_api_key
    }

    /// Runtime mode from `APP_ENV`
    pub fn mode(&self) -> RuntimeMode {
        self.mode
    }

    /// True when `APP_ENV=production`
    pub fn is_production(&self) -> bool {
        self.mode == RuntimeMode::Production
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &str| if value.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("AppConfig")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("hugging_face_api_key", &redact(&self.hugging_face_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("stability_api_key", &redact(&self.stability_api_key))
            .field("mode", &self.mode)
            .finish()
    }
}

/// The format check is advisory, a bad prefix only warns.
fn check_hugging_face_token(token: &str) -> bool {
    if token.starts_with(HUGGING_FACE_TOKEN_PREFIX) {
        return true;
    }
    let preview: String = token.chars().take(10).collect();
    warn!(
        "HUGGING_FACE_API_KEY should start with '{}' but got: {}... Make sure you copied the correct token from https://huggingface.co/settings/tokens",
        HUGGING_FACE_TOKEN_PREFIX, preview
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn loads_required_and_defaults_optional() {
        let config = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY, "gem"),
            (HUGGING_FACE_API_KEY, "hf_abc"),
        ]))
        .expect("config loads");

        assert_eq!(config.gemini_api_key(), "gem");
        assert_eq!(config.hugging_face_api_key(), "hf_abc");
        assert_eq!(config.openai_api_key(), "");
        assert_eq!(config.stability_api_key(), "");
        assert_eq!(config.mode(), RuntimeMode::Development);
    }

    #[test]
    fn missing_keys_are_all_listed() {
        let err = AppConfig::from_lookup(lookup(&[])).expect_err("should fail");
        let ConfigError::Missing(missing) = &err;
        assert_eq!(missing, &vec![GEMINI_API_KEY, HUGGING_FACE_API_KEY]);

        let message = err.to_string();
        assert!(message.contains("GEMINI_API_KEY, HUGGING_FACE_API_KEY"));
        assert!(message.contains("https://aistudio.google.com/app/apikey"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY, ""),
            (HUGGING_FACE_API_KEY, "hf_abc"),
        ]))
        .expect_err("should fail");
        let ConfigError::Missing(missing) = err;
        assert_eq!(missing, vec![GEMINI_API_KEY]);
    }

    #[test]
    fn bad_token_prefix_only_warns() {
        assert!(!check_hugging_face_token("sk-nothing-like-it"));
        assert!(check_hugging_face_token("hf_fine"));

        let config = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY, "gem"),
            (HUGGING_FACE_API_KEY, "not-a-hf-token"),
        ]));
        assert!(config.is_ok());
    }

    #[test]
    fn production_mode_and_redacted_debug() {
        let config = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY, "super-secret"),
            (HUGGING_FACE_API_KEY, "hf_secret"),
            (APP_ENV, "production"),
        ]))
        .expect("config loads");
        assert!(config.is_production());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("<unset>"));
    }
}
