use std::io::Cursor;
use std::time::Instant;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::markdown::{extract_description, extract_title};
use crate::prompts::build_image_prompt;

/// JPEG quality used when recompressing generated images. Bounds the size
/// of published images at the cost of some visual quality.
const JPEG_QUALITY: u8 = 75;

/// Client for generating and recompressing recipe illustration images.
pub struct ImageGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ImageGenerator {
    /// Create a generator from application configuration.
    ///
    /// A distinct image API key is honored when configured; otherwise the
    /// text key is reused.
    pub fn new(config: &AppConfig) -> Result<Self, RecipeError> {
        Ok(ImageGenerator {
            client: Client::new(),
            api_key: config.image_api_key()?.to_string(),
            base_url: config.openai_base_url.clone(),
            model: config.models.image_generation.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        ImageGenerator {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Generate an illustration for the recipe and recompress it to a
    /// bounded-size JPEG.
    pub async fn generate(
        &self,
        recipe_text: &str,
        extra_instructions: &str,
    ) -> Result<Vec<u8>, RecipeError> {
        let title = extract_title(recipe_text);
        let description = extract_description(recipe_text);
        info!("Extracted recipe title for image generation: '{}'", title);

        let prompt = build_image_prompt(&title, &description, extra_instructions);
        info!("Generating image with prompt: '{}'", prompt);
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "size": "1024x1024",
                "quality": "high",
                "n": 1
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
        info!(
            "Image generation completed in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );

        let raw_image = self.decode_payload(&response_body).await?;
        self.recompress(&raw_image)
    }

    /// Obtain raw image bytes from either response variant: an inline
    /// base64 payload or a downloadable URL.
    async fn decode_payload(&self, response_body: &Value) -> Result<Vec<u8>, RecipeError> {
        let item = &response_body["data"][0];

        if let Some(b64) = item["b64_json"].as_str() {
            debug!("Decoding inline base64 image payload");
            return Ok(STANDARD.decode(b64)?);
        }

        if let Some(url) = item["url"].as_str() {
            info!("Downloading generated image");
            let image_response = self.client.get(url).send().await?.error_for_status()?;
            return Ok(image_response.bytes().await?.to_vec());
        }

        Err(RecipeError::InvalidResponse(
            "image response carried neither b64_json nor url".to_string(),
        ))
    }

    /// Normalize color mode to RGB and re-encode as JPEG at fixed quality.
    fn recompress(&self, raw: &[u8]) -> Result<Vec<u8>, RecipeError> {
        let decoded = image::load_from_memory(raw)?;
        // RGBA and palette images cannot be written as JPEG directly
        let rgb = decoded.to_rgb8();

        let mut compressed = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut compressed, JPEG_QUALITY);
        rgb.write_with_encoder(encoder)?;

        let compressed_bytes = compressed.into_inner();
        info!(
            "Image compressed: {:.1}KB -> {:.1}KB ({:.1}%)",
            raw.len() as f64 / 1024.0,
            compressed_bytes.len() as f64 / 1024.0,
            compressed_bytes.len() as f64 / raw.len() as f64 * 100.0
        );
        Ok(compressed_bytes)
    }
}
