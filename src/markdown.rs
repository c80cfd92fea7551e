//! Narrowly-scoped helpers for semi-structured model output: fence
//! stripping, date stamping, and regex extraction of single frontmatter
//! fields with fixed fallbacks. Deliberately not a frontmatter parser.

use std::sync::OnceLock;

use log::{info, warn};
use regex::Regex;

/// Fallback slug when the model omitted `technical_title`
pub const DEFAULT_TECHNICAL_TITLE: &str = "untitled-recipe";
/// Fallback display title for image prompts
pub const DEFAULT_TITLE: &str = "Food Recipe";
/// Fallback one-line description for image prompts
pub const DEFAULT_DESCRIPTION: &str = "Delicious food";

fn fence_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```(?:markdown)?\n").unwrap())
}

fn fence_close_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n```\s*$").unwrap())
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(date\s*=\s*)"[^"]*""#).unwrap())
}

fn technical_title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^technical_title\s*=\s*"([^"]+)""#).unwrap())
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^title\s*=\s*"([^"]+)""#).unwrap())
}

fn description_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^description\s*=\s*"([^"]+)""#).unwrap())
}

/// Remove optional markdown code fences the model may wrap around its
/// output despite instructions not to, and trim outer whitespace.
pub fn strip_markdown_fences(text: &str) -> String {
    let text = fence_open_re().replace(text.trim_start(), "");
    let text = fence_close_re().replace(&text, "");
    text.trim().to_string()
}

/// Rewrite the quoted value of a `date = "..."` assignment to today's
/// date in YYYY-MM-DD form. Everything else is left byte-identical; a
/// missing date field is a no-op.
pub fn stamp_current_date(text: &str) -> String {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    stamp_date(text, &today)
}

fn stamp_date(text: &str, date: &str) -> String {
    date_re()
        .replace(text, |caps: &regex::Captures| {
            format!("{}\"{}\"", &caps[1], date)
        })
        .into_owned()
}

/// Extract the technical title from a recipe frontmatter block.
pub fn extract_technical_title(recipe_text: &str) -> String {
    match technical_title_re()
        .captures(recipe_text)
        .map(|caps| caps[1].to_string())
    {
        Some(technical_title) => {
            info!("Extracted technical title: {}", technical_title);
            technical_title
        }
        None => {
            warn!(
                "Could not extract technical title, using default: {}",
                DEFAULT_TECHNICAL_TITLE
            );
            DEFAULT_TECHNICAL_TITLE.to_string()
        }
    }
}

/// Extract the display title used when building an image prompt.
pub fn extract_title(recipe_text: &str) -> String {
    match title_re()
        .captures(recipe_text)
        .map(|caps| caps[1].to_string())
    {
        Some(title) => title,
        None => {
            warn!("Could not extract title, using default: {}", DEFAULT_TITLE);
            DEFAULT_TITLE.to_string()
        }
    }
}

/// Extract the one-line description used when building an image prompt.
pub fn extract_description(recipe_text: &str) -> String {
    match description_re()
        .captures(recipe_text)
        .map(|caps| caps[1].to_string())
    {
        Some(description) => description,
        None => {
            warn!(
                "Could not extract description, using default: {}",
                DEFAULT_DESCRIPTION
            );
            DEFAULT_DESCRIPTION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences() {
        let wrapped = "```markdown\n+++\ntitle = \"Soup\"\n+++\n```";
        assert_eq!(strip_markdown_fences(wrapped), "+++\ntitle = \"Soup\"\n+++");
    }

    #[test]
    fn test_strip_fences_plain_fence() {
        let wrapped = "```\nsome text\n```\n";
        assert_eq!(strip_markdown_fences(wrapped), "some text");
    }

    #[test]
    fn test_strip_fences_is_noop_without_fence() {
        let text = "## Title\nSome method step.";
        assert_eq!(strip_markdown_fences(text), text);
    }

    #[test]
    fn test_strip_fences_is_idempotent() {
        let wrapped = "```markdown\n# Recipe\nbody\n```";
        let once = strip_markdown_fences(wrapped);
        let twice = strip_markdown_fences(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_stamp_date_rewrites_only_date_value() {
        let text = "author = \"A\"\ndate = \"2020-01-01\"\ntitle = \"T\"";
        let stamped = stamp_date(text, "2026-08-31");
        assert_eq!(stamped, "author = \"A\"\ndate = \"2026-08-31\"\ntitle = \"T\"");
    }

    #[test]
    fn test_stamp_date_without_field_is_noop() {
        let text = "title = \"T\"\nimage = \"image.jpg\"";
        assert_eq!(stamp_date(text, "2026-08-31"), text);
    }

    #[test]
    fn test_stamp_current_date_format() {
        let stamped = stamp_current_date("date = \"placeholder\"");
        let re = Regex::new(r#"^date = "\d{4}-\d{2}-\d{2}"$"#).unwrap();
        assert!(re.is_match(&stamped), "unexpected output: {}", stamped);
    }

    #[test]
    fn test_extract_technical_title() {
        let text = "+++\ntitle = \"Chicken Soup\"\ntechnical_title = \"chicken-soup\"\n+++";
        assert_eq!(extract_technical_title(text), "chicken-soup");
    }

    #[test]
    fn test_extract_technical_title_default() {
        assert_eq!(
            extract_technical_title("no frontmatter here"),
            "untitled-recipe"
        );
    }

    #[test]
    fn test_extract_title_and_description() {
        let text = "+++\ntitle = \"Roast Chicken\"\ntechnical_title = \"roast-chicken\"\n+++";
        assert_eq!(extract_title(text), "Roast Chicken");
        assert_eq!(extract_description(text), "Delicious food");
    }

    #[test]
    fn test_extract_title_ignores_technical_title() {
        let text = "technical_title = \"roast-chicken\"";
        assert_eq!(extract_title(text), "Food Recipe");
    }

    #[test]
    fn test_extract_description_present() {
        let text = "description = \"A hearty soup for cold days\"";
        assert_eq!(extract_description(text), "A hearty soup for cold days");
    }
}
