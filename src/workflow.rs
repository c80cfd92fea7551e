use log::info;

use crate::config::AppConfig;
use crate::conversion::RecipeConverter;
use crate::error::RecipeError;
use crate::extraction::TextExtractor;
use crate::github::GithubPublisher;
use crate::illustration::ImageGenerator;
use crate::session::SessionState;

/// Which screen a frontend should present for the current session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    /// No converted recipe yet: show the upload/input form
    Input,
    /// A converted recipe exists: show preview, edit, and image controls
    Preview,
    /// A pull request was opened: show its URL and offer a reset
    Published,
}

/// Sequences the clients behind the multi-step recipe flow: extract,
/// convert, preview/edit, generate image, publish.
///
/// Every step is an explicit caller-driven action; a failed step leaves
/// the session where it was so the user can re-submit. The one partial
/// state kept on purpose: when conversion succeeds but image generation
/// fails, the converted recipe is retained and only the image slot stays
/// empty, blocking publish until a regeneration succeeds.
pub struct RecipeWorkflow {
    converter: RecipeConverter,
    extractor: TextExtractor,
    generator: ImageGenerator,
    publisher: GithubPublisher,
    state: SessionState,
    pr_url: Option<String>,
}

impl RecipeWorkflow {
    /// Construct every client once from the configuration.
    ///
    /// Missing credentials for any client surface here, before the first
    /// network call.
    pub fn new(config: &AppConfig) -> Result<Self, RecipeError> {
        Ok(RecipeWorkflow {
            converter: RecipeConverter::new(config)?,
            extractor: TextExtractor::new(config)?,
            generator: ImageGenerator::new(config)?,
            publisher: GithubPublisher::new(config)?,
            state: SessionState::default(),
            pr_url: None,
        })
    }

    #[doc(hidden)]
    pub fn from_parts(
        converter: RecipeConverter,
        extractor: TextExtractor,
        generator: ImageGenerator,
        publisher: GithubPublisher,
    ) -> Self {
        RecipeWorkflow {
            converter,
            extractor,
            generator,
            publisher,
            state: SessionState::default(),
            pr_url: None,
        }
    }

    /// Current session state, for rendering previews and pre-filled forms.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// URL of the opened pull request, once publishing succeeded.
    pub fn pr_url(&self) -> Option<&str> {
        self.pr_url.as_deref()
    }

    /// Derive the step a frontend should render from the session contents.
    pub fn step(&self) -> WorkflowStep {
        if self.pr_url.is_some() {
            WorkflowStep::Published
        } else if !self.state.final_recipe.is_empty() {
            WorkflowStep::Preview
        } else {
            WorkflowStep::Input
        }
    }

    /// Optional first step: extract recipe text from an uploaded photo.
    /// The result pre-fills the text input of the next step.
    pub async fn extract_from_image(
        &mut self,
        image_bytes: &[u8],
        extra_instructions: &str,
    ) -> Result<(), RecipeError> {
        let extracted = self
            .extractor
            .extract_from_image(image_bytes, extra_instructions)
            .await?;
        self.state.extracted_text = extracted;
        Ok(())
    }

    /// Input step: convert a linked or pasted recipe, then generate its
    /// illustration. A link takes precedence over pasted text.
    pub async fn submit(
        &mut self,
        recipe_link: Option<&str>,
        recipe_text: &str,
        user_instructions: &str,
    ) -> Result<(), RecipeError> {
        let link = recipe_link.map(str::trim).filter(|l| !l.is_empty());
        if link.is_none() && recipe_text.trim().is_empty() {
            return Err(RecipeError::InvalidInput(
                "Please provide either a link or some recipe text.".to_string(),
            ));
        }

        let recipe_text = match link {
            Some(url) => self.extractor.extract_from_link(url, "").await?,
            None => recipe_text.to_string(),
        };
        if recipe_text.trim().is_empty() {
            return Err(RecipeError::InvalidInput(
                "No recipe text found or extraction failed.".to_string(),
            ));
        }

        let result = self.converter.convert(&recipe_text, user_instructions).await?;
        self.state.final_recipe = result.formatted_recipe;
        self.state.technical_title = result.technical_title;

        // The recipe above is kept even when this fails; the empty image
        // slot blocks publishing until a regeneration succeeds.
        let image = self.generator.generate(&self.state.final_recipe, "").await?;
        self.state.compressed_image_bytes = Some(image);
        Ok(())
    }

    /// Preview step: overwrite the recipe text with the user's edits.
    pub fn edit_recipe(&mut self, edited_recipe: &str) {
        self.state.final_recipe = edited_recipe.to_string();
    }

    /// Preview step: regenerate the illustration with fresh instructions.
    pub async fn regenerate_image(&mut self, extra_instructions: &str) -> Result<(), RecipeError> {
        let image = self
            .generator
            .generate(&self.state.final_recipe, extra_instructions)
            .await?;
        self.state.compressed_image_bytes = Some(image);
        Ok(())
    }

    /// Publish step: commit the recipe and image, open the pull request,
    /// and return its URL. Requires a generated image.
    pub async fn publish(&mut self) -> Result<String, RecipeError> {
        let image_bytes = self.state.compressed_image_bytes.as_deref().ok_or_else(|| {
            RecipeError::InvalidInput("Generate an image before publishing.".to_string())
        })?;

        let pr_url = self
            .publisher
            .publish(
                &self.state.final_recipe,
                image_bytes,
                &self.state.technical_title,
            )
            .await?;
        self.pr_url = Some(pr_url.clone());
        Ok(pr_url)
    }

    /// Clear everything and return to the input step.
    pub fn reset(&mut self) {
        info!("Resetting session for a new recipe");
        self.state.reset();
        self.pr_url = None;
    }
}
