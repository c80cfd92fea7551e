use mockito::{Matcher, Server};
use recipe_converter::GithubPublisher;
use serde_json::json;

const RECIPE: &str = "+++\ntitle = \"Test Recipe\"\ntechnical_title = \"test-recipe\"\n+++\n## Test Recipe";

/// End-to-end publish against a mocked hosting API: branch created from
/// the default branch head, exactly two files committed, PR URL returned.
#[tokio::test]
async fn test_publish_creates_branch_files_and_pr() {
    let mut server = Server::new_async().await;

    let repo_meta = server
        .mock("GET", "/repos/owner/recipes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"default_branch": "master"}).to_string())
        .create();

    let branch_meta = server
        .mock("GET", "/repos/owner/recipes/branches/master")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"commit": {"sha": "abc123"}}).to_string())
        .create();

    let create_ref = server
        .mock("POST", "/repos/owner/recipes/git/refs")
        .match_body(Matcher::PartialJson(json!({
            "ref": "refs/heads/recipe/test-recipe",
            "sha": "abc123",
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"ref": "refs/heads/recipe/test-recipe"}).to_string())
        .create();

    let create_markdown = server
        .mock(
            "PUT",
            "/repos/owner/recipes/contents/content/post/test-recipe/index.md",
        )
        .match_body(Matcher::PartialJson(json!({
            "message": "Add new recipe test-recipe",
            "branch": "recipe/test-recipe",
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"content": {"sha": "md-sha"}}).to_string())
        .create();

    let create_image = server
        .mock(
            "PUT",
            "/repos/owner/recipes/contents/content/post/test-recipe/image.jpg",
        )
        .match_body(Matcher::PartialJson(json!({
            "message": "Add image for recipe test-recipe",
            "branch": "recipe/test-recipe",
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"content": {"sha": "img-sha"}}).to_string())
        .create();

    let create_pull = server
        .mock("POST", "/repos/owner/recipes/pulls")
        .match_body(Matcher::PartialJson(json!({
            "title": "New Recipe: test-recipe",
            "head": "recipe/test-recipe",
            "base": "master",
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"html_url": "https://github.com/owner/recipes/pull/7"}).to_string(),
        )
        .create();

    let publisher = GithubPublisher::with_base_url(
        "fake_token".to_string(),
        "owner/recipes".to_string(),
        server.url(),
        "content/post".to_string(),
    );

    let pr_url = publisher
        .publish(RECIPE, b"fake jpeg bytes", "test-recipe")
        .await
        .unwrap();
    assert_eq!(pr_url, "https://github.com/owner/recipes/pull/7");

    repo_meta.assert();
    branch_meta.assert();
    create_ref.assert();
    create_markdown.assert();
    create_image.assert();
    create_pull.assert();
}

/// A branch-already-exists answer from the hosting API propagates as a
/// fatal error; nothing gets retried or rolled back.
#[tokio::test]
async fn test_publish_fails_when_branch_exists() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/repos/owner/recipes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"default_branch": "master"}).to_string())
        .create();
    server
        .mock("GET", "/repos/owner/recipes/branches/master")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"commit": {"sha": "abc123"}}).to_string())
        .create();
    let create_ref = server
        .mock("POST", "/repos/owner/recipes/git/refs")
        .with_status(422)
        .with_body(json!({"message": "Reference already exists"}).to_string())
        .create();

    let publisher = GithubPublisher::with_base_url(
        "fake_token".to_string(),
        "owner/recipes".to_string(),
        server.url(),
        "content/post".to_string(),
    );

    let err = publisher
        .publish(RECIPE, b"fake jpeg bytes", "test-recipe")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("GitHub API error"));
    create_ref.assert();
}
