use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::RecipeError;

/// Client that commits a finished recipe to a content repository on a
/// feature branch and opens a pull request against the default branch.
///
/// Publishing is not idempotent: a second publish of the same technical
/// title fails at branch creation, and partial failures leave the branch
/// and any committed files behind.
#[derive(Debug)]
pub struct GithubPublisher {
    client: Client,
    token: String,
    repo: String,
    api_base: String,
    recipes_folder: String,
}

impl GithubPublisher {
    /// Create a publisher from application configuration.
    ///
    /// Fails with a [`RecipeError::MissingEnv`] naming every absent
    /// variable when the bearer token or repository identifier is unset.
    pub fn new(config: &AppConfig) -> Result<Self, RecipeError> {
        let (token, repo) = config.github_credentials()?;
        Ok(GithubPublisher {
            client: Client::new(),
            token: token.to_string(),
            repo: repo.to_string(),
            api_base: config.github_api_url.clone(),
            recipes_folder: config.recipes_folder.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(
        token: String,
        repo: String,
        api_base: String,
        recipes_folder: String,
    ) -> Self {
        GithubPublisher {
            client: Client::new(),
            token,
            repo,
            api_base,
            recipes_folder,
        }
    }

    /// Create a recipe branch, commit the markdown and image files, and
    /// open a pull request. Returns the pull request URL.
    pub async fn publish(
        &self,
        final_recipe: &str,
        image_bytes: &[u8],
        technical_title: &str,
    ) -> Result<String, RecipeError> {
        info!(
            "Starting pull request creation for recipe: {}",
            technical_title
        );

        let repo_meta = self.send(self.request(Method::GET, "")).await?;
        let default_branch = repo_meta["default_branch"]
            .as_str()
            .ok_or_else(|| {
                RecipeError::InvalidResponse("repository metadata lacks default_branch".to_string())
            })?
            .to_string();

        let branch_meta = self
            .send(self.request(Method::GET, &format!("/branches/{}", default_branch)))
            .await?;
        let head_sha = branch_meta["commit"]["sha"]
            .as_str()
            .ok_or_else(|| {
                RecipeError::InvalidResponse("branch metadata lacks head commit sha".to_string())
            })?
            .to_string();

        let new_branch = format!("recipe/{}", technical_title);
        info!(
            "Creating new branch '{}' from {}",
            new_branch, default_branch
        );
        self.send(self.request(Method::POST, "/git/refs").json(&json!({
            "ref": format!("refs/heads/{}", new_branch),
            "sha": head_sha,
        })))
        .await?;

        let recipe_path = format!("{}/{}/index.md", self.recipes_folder, technical_title);
        info!(
            "Committing recipe content to {} - Size: {} bytes",
            recipe_path,
            final_recipe.len()
        );
        self.create_file(
            &recipe_path,
            &format!("Add new recipe {}", technical_title),
            final_recipe.as_bytes(),
            &new_branch,
        )
        .await?;

        let image_path = format!("{}/{}/image.jpg", self.recipes_folder, technical_title);
        self.create_file(
            &image_path,
            &format!("Add image for recipe {}", technical_title),
            image_bytes,
            &new_branch,
        )
        .await?;
        info!(
            "Uploaded image to {} - Size: {:.1}KB",
            image_path,
            image_bytes.len() as f64 / 1024.0
        );

        let pr = self
            .send(self.request(Method::POST, "/pulls").json(&json!({
                "title": format!("New Recipe: {}", technical_title),
                "body": format!(
                    "Auto-generated recipe PR for {}. Please review.",
                    technical_title
                ),
                "head": new_branch,
                "base": default_branch,
            })))
            .await?;

        let pr_url = pr["html_url"]
            .as_str()
            .ok_or_else(|| {
                RecipeError::InvalidResponse("pull request response lacks html_url".to_string())
            })?
            .to_string();
        info!("Pull request created successfully: {}", pr_url);
        Ok(pr_url)
    }

    async fn create_file(
        &self,
        path: &str,
        message: &str,
        content: &[u8],
        branch: &str,
    ) -> Result<(), RecipeError> {
        let body = self
            .send(
                self.request(Method::PUT, &format!("/contents/{}", path))
                    .json(&json!({
                        "message": message,
                        "content": STANDARD.encode(content),
                        "branch": branch,
                    })),
            )
            .await?;
        debug!("File SHA: {:?}", body["content"]["sha"].as_str());
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(
                method,
                format!("{}/repos/{}{}", self.api_base, self.repo, path),
            )
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "recipe-converter")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, RecipeError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await?;
            return Err(RecipeError::Api {
                provider: "GitHub",
                status,
                message,
            });
        }
        Ok(response.json().await?)
    }
}
