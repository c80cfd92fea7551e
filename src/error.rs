use thiserror::Error;

/// Errors that can occur while converting or publishing a recipe
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Required environment configuration is absent
    #[error("Missing required environment variables: {0}")]
    MissingEnv(String),

    /// HTTP transport failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A remote API answered with a non-success status
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },

    /// A remote API answered 2xx but the body did not have the expected shape
    #[error("Unexpected API response: {0}")]
    InvalidResponse(String),

    /// Image decode or re-encode failure
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    /// Base64 payload could not be decoded
    #[error("Base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Configuration file or environment parsing error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The caller supplied input the workflow cannot act on
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
