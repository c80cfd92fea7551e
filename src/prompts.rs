//! Prompt templates shared across the application.

/// The conversion prompt encoding the full target markdown schema and the
/// unit-conversion rules.
///
/// The prompt is loaded from `recipe_prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax. It carries `{recipe_text}` and `{user_instructions}`
/// placeholders substituted by [`build_recipe_prompt`].
pub const RECIPE_PROMPT_TEMPLATE: &str = include_str!("recipe_prompt.txt");

/// Illustration-style template for image generation prompts.
pub const IMAGE_PROMPT_TEMPLATE: &str = "A cartoon sketch of the food, inspired by the illustrative style used in The Great British Bake Off, characterized by bold lines, vibrant colors, and a playful, whimsical feel. Never have text in the image.It should depict {title} which is {description}. {extra_instructions}";

/// Render the conversion prompt. Pure function, no I/O.
pub fn build_recipe_prompt(recipe_text: &str, user_instructions: &str) -> String {
    RECIPE_PROMPT_TEMPLATE
        .replace("{user_instructions}", user_instructions)
        .replace("{recipe_text}", recipe_text)
}

/// Render the image generation prompt. Pure function, no I/O.
pub fn build_image_prompt(title: &str, description: &str, extra_instructions: &str) -> String {
    IMAGE_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{description}", description)
        .replace("{extra_instructions}", extra_instructions)
}
