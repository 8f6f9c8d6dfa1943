//! Defaults and fixed literals
//!

/// Model used for greeting generation unless overridden on the command line
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Where the Gemini REST API lives
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Template image the greeting page sends along with every prompt,
/// relative to the content root.
pub const DEFAULT_TEMPLATE_PATH: &str = "public/test-images/template.png";

/// Directory under the public dir that generated images land in
pub const GENERATED_DIR_NAME: &str = "generated";

/// URL prefix generated images are served from
pub const GENERATED_URL_PREFIX: &str = "/generated";

/// The template image is always sent upstream as PNG.
pub const TEMPLATE_MIME_TYPE: &str = "image/png";

/// A 1x1 transparent PNG, written when the template image is missing.
pub const PLACEHOLDER_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==";

/// Length of the random token appended to generated filenames
pub const GENERATED_TOKEN_LENGTH: usize = 12;

/// Prefix every valid Hugging Face token starts with
pub const HUGGING_FACE_TOKEN_PREFIX: &str = "hf_";
