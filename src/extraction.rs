use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::markdown::strip_markdown_fences;

const IMAGE_EXTRACTION_INSTRUCTIONS: &str = "You are an AI assistant that extracts all visible text from the provided image. Extract all recipe details including ingredients, instructions, and cooking times.";

const LINK_EXTRACTION_INSTRUCTIONS: &str = "You are an AI assistant that extracts the food recipe from this raw HTML.\nExtract all recipe details including title, ingredients, instructions, and cooking times.";

/// Client for turning recipe photos and recipe web pages into plain text.
///
/// Both paths hand the raw input to a vision-capable text endpoint; there
/// is no local OCR and no DOM parsing.
#[derive(Debug)]
pub struct TextExtractor {
    client: Client,
    fetch_client: Client,
    api_key: String,
    base_url: String,
    image_model: String,
    link_model: String,
}

impl TextExtractor {
    /// Create an extractor from application configuration
    pub fn new(config: &AppConfig) -> Result<Self, RecipeError> {
        Self::build(
            config.openai_api_key()?.to_string(),
            config.openai_base_url.clone(),
            config.models.text_extraction_image.clone(),
            config.models.text_extraction_link.clone(),
            Duration::from_secs(config.fetch_timeout),
        )
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        Self::build(
            api_key,
            base_url,
            model.clone(),
            model,
            Duration::from_secs(10),
        )
        .expect("default fetch client")
    }

    fn build(
        api_key: String,
        base_url: String,
        image_model: String,
        link_model: String,
        fetch_timeout: Duration,
    ) -> Result<Self, RecipeError> {
        // The page fetch is the only path with an explicit timeout
        let fetch_client = Client::builder()
            .timeout(fetch_timeout)
            .user_agent("Mozilla/5.0 (compatible; RecipeConverter/1.0)")
            .build()?;

        Ok(TextExtractor {
            client: Client::new(),
            fetch_client,
            api_key,
            base_url,
            image_model,
            link_model,
        })
    }

    /// Extract visible recipe text from an uploaded image.
    pub async fn extract_from_image(
        &self,
        image_bytes: &[u8],
        extra_instructions: &str,
    ) -> Result<String, RecipeError> {
        let base64_image = STANDARD.encode(image_bytes);
        info!(
            "Processing image for text extraction - Size: {:.1}KB",
            image_bytes.len() as f64 / 1024.0
        );

        let start = Instant::now();
        let instructions = format!("{} {}", IMAGE_EXTRACTION_INSTRUCTIONS, extra_instructions);
        let body = json!({
            "model": self.image_model,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": instructions.trim()},
                    {
                        "type": "image_url",
                        "image_url": {"url": format!("data:image/jpeg;base64,{}", base64_image)}
                    }
                ]
            }]
        });

        let raw = self.call_model(&body).await?;
        info!(
            "Text extraction completed in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );

        let extracted_text = strip_markdown_fences(&raw);
        info!(
            "Extracted {} characters of text from image",
            extracted_text.len()
        );
        Ok(extracted_text)
    }

    /// Fetch a web page and hand its entire HTML body to the model with
    /// extraction instructions. Non-2xx fetch responses are fatal.
    pub async fn extract_from_link(
        &self,
        link: &str,
        extra_instructions: &str,
    ) -> Result<String, RecipeError> {
        info!("Fetching content from URL: {}", link);
        let page_html = self
            .fetch_client
            .get(link)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        info!(
            "Successfully retrieved HTML content - Size: {:.1}KB",
            page_html.len() as f64 / 1024.0
        );

        let start = Instant::now();
        let instructions = format!("{}\n{}", LINK_EXTRACTION_INSTRUCTIONS, extra_instructions);
        let body = json!({
            "model": self.link_model,
            "messages": [
                {"role": "system", "content": instructions.trim()},
                {"role": "user", "content": page_html}
            ]
        });

        let raw = self.call_model(&body).await?;
        info!(
            "Recipe extraction from HTML completed in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );

        let extracted_text = strip_markdown_fences(&raw).trim().to_string();
        info!(
            "Extracted {} characters of recipe text from URL",
            extracted_text.len()
        );
        Ok(extracted_text)
    }

    async fn call_model(&self, body: &Value) -> Result<String, RecipeError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
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
        response_body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                RecipeError::InvalidResponse("no message content in completion".to_string())
            })
    }
}
