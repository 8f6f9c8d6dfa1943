//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::{DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPLATE_PATH};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "DIVINE_DEBUG")]
    /// Enable debug logging. Env: DIVINE_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "DIVINE_PORT")]
    /// http listener, defaults to `9000`.
    /// Env: DIVINE_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "DIVINE_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: DIVINE_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, default_value = ".", env = "DIVINE_CONTENT_ROOT")]
    /// Directory `imagePath` values are resolved against.
    /// Env: DIVINE_CONTENT_ROOT
    pub content_root: PathBuf,

    #[clap(long, default_value = "public", env = "DIVINE_PUBLIC_DIR")]
    /// Public dir, generated images go in its `generated` child. Relative
    /// paths are taken from the content root.
    /// Env: DIVINE_PUBLIC_DIR
    pub public_dir: PathBuf,

    #[clap(long, default_value = DEFAULT_TEMPLATE_PATH, env = "DIVINE_TEMPLATE_PATH")]
    /// Template image the greeting page sends, relative to the content root.
    /// Env: DIVINE_TEMPLATE_PATH
    pub template_path: String,

    #[clap(long, default_value = DEFAULT_MODEL, env = "DIVINE_MODEL")]
    /// Gemini model ID.
    /// Env: DIVINE_MODEL
    pub model: String,

    #[clap(long, default_value = DEFAULT_GEMINI_BASE_URL, env = "DIVINE_GEMINI_BASE_URL")]
    /// Gemini API base URL.
    /// Env: DIVINE_GEMINI_BASE_URL
    pub gemini_base_url: String,
}
