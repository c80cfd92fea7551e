pub mod config;
pub mod conversion;
pub mod error;
pub mod extraction;
pub mod github;
pub mod illustration;
pub mod markdown;
pub mod model;
pub mod prompts;
pub mod session;
pub mod workflow;

pub use config::AppConfig;
pub use conversion::RecipeConverter;
pub use error::RecipeError;
pub use extraction::TextExtractor;
pub use github::GithubPublisher;
pub use illustration::ImageGenerator;
pub use model::RecipeConversionResult;
pub use session::SessionState;
pub use workflow::{RecipeWorkflow, WorkflowStep};

/// Convert pasted recipe text using configuration from the environment.
pub async fn convert_recipe(
    recipe_text: &str,
    user_instructions: &str,
) -> Result<RecipeConversionResult, RecipeError> {
    let config = AppConfig::load()?;
    let converter = RecipeConverter::new(&config)?;
    converter.convert(recipe_text, user_instructions).await
}

/// Extract a recipe from a URL and convert it, using configuration from
/// the environment.
pub async fn import_from_url(
    url: &str,
    user_instructions: &str,
) -> Result<RecipeConversionResult, RecipeError> {
    let config = AppConfig::load()?;
    let extractor = TextExtractor::new(&config)?;
    let recipe_text = extractor.extract_from_link(url, "").await?;

    let converter = RecipeConverter::new(&config)?;
    converter.convert(&recipe_text, user_instructions).await
}
