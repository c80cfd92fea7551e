use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::RecipeError;

/// Application configuration, constructed once at startup and passed by
/// reference into each client component.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// API key for the text endpoints
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Optional distinct API key for the image endpoint
    #[serde(default)]
    pub openai_image_api_key: Option<String>,
    /// Bearer token for the GitHub API
    #[serde(default)]
    pub github_access_token: Option<String>,
    /// Repository in "owner/name" form that receives recipe pull requests
    #[serde(default)]
    pub github_repo_name: Option<String>,
    /// Folder in the content repository where recipes are committed
    #[serde(default = "default_recipes_folder")]
    pub recipes_folder: String,
    /// Base URL for the OpenAI-compatible API
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    /// Base URL for the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    /// Model identifiers per operation
    #[serde(default)]
    pub models: ModelConfig,
    /// Timeout in seconds for fetching external web pages
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: u64,
}

/// Model identifiers are provider-specific configuration, not part of the
/// portable design, so each operation's model can be overridden.
#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_conversion_model")]
    pub conversion: String,
    #[serde(default = "default_extraction_model")]
    pub text_extraction_image: String,
    #[serde(default = "default_extraction_model")]
    pub text_extraction_link: String,
    #[serde(default = "default_image_model")]
    pub image_generation: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            conversion: default_conversion_model(),
            text_extraction_image: default_extraction_model(),
            text_extraction_link: default_extraction_model(),
            image_generation: default_image_model(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_image_api_key: None,
            github_access_token: None,
            github_repo_name: None,
            recipes_folder: default_recipes_folder(),
            openai_base_url: default_openai_base_url(),
            github_api_url: default_github_api_url(),
            models: ModelConfig::default(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

// Default value functions
fn default_recipes_folder() -> String {
    "content/post".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_conversion_model() -> String {
    "gpt-4.1-2025-04-14".to_string()
}

fn default_extraction_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_image_model() -> String {
    "gpt-image-1".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (OPENAI_API_KEY, GITHUB_ACCESS_TOKEN, ...)
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Nested fields use double underscores: MODELS__CONVERSION
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        settings.try_deserialize()
    }

    /// API key for the text endpoints, or an error naming the variable
    pub fn openai_api_key(&self) -> Result<&str, RecipeError> {
        self.openai_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RecipeError::MissingEnv("OPENAI_API_KEY".to_string()))
    }

    /// API key for the image endpoint, falling back to the text key
    pub fn image_api_key(&self) -> Result<&str, RecipeError> {
        match self
            .openai_image_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
        {
            Some(key) => Ok(key),
            None => self.openai_api_key(),
        }
    }

    /// GitHub bearer token and repository identifier
    ///
    /// Reports every missing variable at once so a bare environment gets a
    /// single actionable message instead of one failure per variable.
    pub fn github_credentials(&self) -> Result<(&str, &str), RecipeError> {
        let token = self
            .github_access_token
            .as_deref()
            .filter(|value| !value.is_empty());
        let repo = self
            .github_repo_name
            .as_deref()
            .filter(|value| !value.is_empty());

        let mut missing = Vec::new();
        if token.is_none() {
            missing.push("GITHUB_ACCESS_TOKEN");
        }
        if repo.is_none() {
            missing.push("GITHUB_REPO_NAME");
        }

        match (token, repo) {
            (Some(token), Some(repo)) => Ok((token, repo)),
            _ => Err(RecipeError::MissingEnv(missing.join(", "))),
        }
    }
}
