/// Per-session working state for one recipe, mutated independently by the
/// workflow step that produces each field and cleared as a whole when the
/// user starts over. Nothing here outlives the session.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    /// The formatted recipe markdown, possibly hand-edited by the user
    pub final_recipe: String,
    /// Recompressed JPEG bytes, absent until image generation succeeds
    pub compressed_image_bytes: Option<Vec<u8>>,
    /// Slug parsed from the recipe frontmatter
    pub technical_title: String,
    /// Text pulled from an uploaded image, used to pre-fill the input step
    pub extracted_text: String,
}

impl SessionState {
    /// Reset every field back to its default, starting a fresh recipe.
    pub fn reset(&mut self) {
        *self = SessionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_all_fields() {
        let mut state = SessionState {
            final_recipe: "recipe".to_string(),
            compressed_image_bytes: Some(vec![1, 2, 3]),
            technical_title: "slug".to_string(),
            extracted_text: "text".to_string(),
        };
        state.reset();
        assert!(state.final_recipe.is_empty());
        assert!(state.compressed_image_bytes.is_none());
        assert!(state.technical_title.is_empty());
        assert!(state.extracted_text.is_empty());
    }
}
