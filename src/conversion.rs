use std::time::Instant;

use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::markdown::{extract_technical_title, stamp_current_date, strip_markdown_fences};
use crate::model::RecipeConversionResult;
use crate::prompts::build_recipe_prompt;

/// Fixed system instruction demanding plain markdown output with no fencing.
const CONVERSION_INSTRUCTIONS: &str = "You are transforming food recipes into a specific markdown format. Respond only with the converted recipe in plain markdown without code fences or syntax highlighting markers.";

/// Client for reformatting raw recipe text into the target markdown schema.
#[derive(Debug)]
pub struct RecipeConverter {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl RecipeConverter {
    /// Create a converter from application configuration
    pub fn new(config: &AppConfig) -> Result<Self, RecipeError> {
        Ok(RecipeConverter {
            client: Client::new(),
            api_key: config.openai_api_key()?.to_string(),
            base_url: config.openai_base_url.clone(),
            model: config.models.conversion.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        RecipeConverter {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Reformat a recipe and extract its technical title.
    ///
    /// Transport and API failures propagate as fatal errors; a missing
    /// technical title in the output is non-fatal and replaced by the
    /// default slug.
    pub async fn convert(
        &self,
        recipe_text: &str,
        user_instructions: &str,
    ) -> Result<RecipeConversionResult, RecipeError> {
        info!(
            "Reformatting recipe. Text length: {} chars",
            recipe_text.len()
        );
        let prompt = build_recipe_prompt(recipe_text, user_instructions);

        let formatted_recipe = self.call_for_recipe(&prompt).await?;
        let technical_title = extract_technical_title(&formatted_recipe);

        Ok(RecipeConversionResult {
            formatted_recipe,
            technical_title,
        })
    }

    /// Send a prompt to the text endpoint and return the normalized
    /// recipe text: fence-stripped and date-stamped.
    async fn call_for_recipe(&self, prompt: &str) -> Result<String, RecipeError> {
        let start = Instant::now();
        info!("Sending prompt - Length: {} characters", prompt.len());

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": CONVERSION_INSTRUCTIONS},
                    {"role": "user", "content": prompt}
                ]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await?;
            return Err(RecipeError::Api {
                provider: "OpenAI",
                status,
                message,
            });
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);
        let raw = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                RecipeError::InvalidResponse("no message content in completion".to_string())
            })?;

        info!(
            "Received response in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );

        let cleaned = strip_markdown_fences(raw);
        debug!(
            "Response after cleaning, first 100 chars: {}...",
            cleaned.chars().take(100).collect::<String>()
        );

        Ok(stamp_current_date(&cleaned))
    }
}
