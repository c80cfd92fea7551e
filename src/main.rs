use std::env;
use std::fs;

use recipe_converter::{
    AppConfig, GithubPublisher, ImageGenerator, RecipeConverter, TextExtractor,
};

enum Source {
    Url(String),
    File(String),
}

fn usage() -> ! {
    eprintln!(
        "Usage: recipe-converter <url | --file PATH> [--instructions TEXT] [--publish]\n\n\
         Converts a recipe into the target markdown format and prints it.\n\
         With --publish, also generates an illustration and opens a pull request."
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let mut source: Option<Source> = None;
    let mut instructions = String::new();
    let mut publish = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" => match args.next() {
                Some(path) => source = Some(Source::File(path)),
                None => usage(),
            },
            "--instructions" => match args.next() {
                Some(text) => instructions = text,
                None => usage(),
            },
            "--publish" => publish = true,
            "--help" | "-h" => usage(),
            url if !url.starts_with('-') => source = Some(Source::Url(url.to_string())),
            _ => usage(),
        }
    }

    let source = match source {
        Some(source) => source,
        None => usage(),
    };

    let config = AppConfig::load()?;

    let recipe_text = match source {
        Source::Url(url) => {
            let extractor = TextExtractor::new(&config)?;
            extractor.extract_from_link(&url, "").await?
        }
        Source::File(path) => fs::read_to_string(path)?,
    };

    let converter = RecipeConverter::new(&config)?;
    let result = converter.convert(&recipe_text, &instructions).await?;

    if publish {
        let generator = ImageGenerator::new(&config)?;
        let publisher = GithubPublisher::new(&config)?;

        let image_bytes = generator.generate(&result.formatted_recipe, "").await?;
        let pr_url = publisher
            .publish(
                &result.formatted_recipe,
                &image_bytes,
                &result.technical_title,
            )
            .await?;
        println!("{}", pr_url);
    } else {
        println!("{}", result.formatted_recipe);
    }

    Ok(())
}
