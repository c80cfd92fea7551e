/// Result of one recipe conversion: the formatted markdown document and
/// the slug parsed out of its frontmatter. Overwritten on every conversion.
#[derive(Debug, Clone)]
pub struct RecipeConversionResult {
    pub formatted_recipe: String,
    pub technical_title: String,
}
