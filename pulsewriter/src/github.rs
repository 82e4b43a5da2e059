//! Publishing connector: opens a pull request on GitHub carrying one
//! generated draft. Three REST calls behind a trait seam so the orchestration
//! is testable without a network.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = "pulsewriter";

/// Operations against a repository hosting service. Implemented by
/// [`GitHubClient`] for real use and by mocks in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Name of the repository's default branch.
    async fn default_branch(&self, repo: &str) -> Result<String>;

    /// Head commit SHA of a branch.
    async fn ref_sha(&self, repo: &str, branch: &str) -> Result<String>;

    /// Create a new branch ref pointing at `sha`.
    async fn create_branch(&self, repo: &str, new_branch: &str, sha: &str) -> Result<()>;

    /// Create or update one file's content on `branch`.
    async fn put_file(
        &self,
        repo: &str,
        branch: &str,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<()>;

    /// Open a pull request from `branch` into `base`, returning its URL.
    async fn open_pr(
        &self,
        repo: &str,
        branch: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<String>;
}

/// Publish one file: resolve the base branch and its head SHA, create a
/// branch, upsert the file on it, then open the pull request.
///
/// Fail-fast with no rollback: a failure at any step leaves the steps already
/// completed in place (a branch or file may be left behind).
pub async fn publish_file<H: RepoHost + ?Sized>(
    host: &H,
    repo: &str,
    branch: &str,
    path: &str,
    content: &str,
    title: &str,
    body: &str,
) -> Result<String> {
    let base = host.default_branch(repo).await?;
    let sha = host.ref_sha(repo, &base).await?;
    host.create_branch(repo, branch, &sha).await?;
    host.put_file(repo, branch, path, content, &format!("add {path}"))
        .await?;
    let url = host.open_pr(repo, branch, &base, title, body).await?;
    info!(repo, branch, url = %url, "Opened pull request");
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    html_url: String,
}

/// GitHub REST v3 client authenticated with a bearer token.
pub struct GitHubClient {
    http: Client,
}

impl GitHubClient {
    /// Construct from the `GH_TOKEN` environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GH_TOKEN").context("Missing GH_TOKEN env var")?;
        Self::new(&token)
    }

    pub fn new(token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("GH_TOKEN contains invalid header characters")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { http })
    }
}

async fn ensure_success(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp
            .text()
            .await
            .unwrap_or_else(|_| String::from("unknown error"));
        bail!("GitHub API error ({what}): {status} - {text}");
    }
    Ok(resp)
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn default_branch(&self, repo: &str) -> Result<String> {
        let resp = self
            .http
            .get(format!("{GITHUB_API}/repos/{repo}"))
            .send()
            .await
            .context("Failed to fetch repository metadata")?;
        let info: RepoInfo = ensure_success(resp, "get repository")
            .await?
            .json()
            .await
            .context("Failed to parse repository metadata")?;
        Ok(info.default_branch)
    }

    async fn ref_sha(&self, repo: &str, branch: &str) -> Result<String> {
        let resp = self
            .http
            .get(format!("{GITHUB_API}/repos/{repo}/git/ref/heads/{branch}"))
            .send()
            .await
            .context("Failed to fetch branch ref")?;
        let git_ref: GitRef = ensure_success(resp, "get ref")
            .await?
            .json()
            .await
            .context("Failed to parse branch ref")?;
        Ok(git_ref.object.sha)
    }

    async fn create_branch(&self, repo: &str, new_branch: &str, sha: &str) -> Result<()> {
        info!(repo, new_branch, "Creating branch ref");
        let resp = self
            .http
            .post(format!("{GITHUB_API}/repos/{repo}/git/refs"))
            .json(&json!({
                "ref": format!("refs/heads/{new_branch}"),
                "sha": sha,
            }))
            .send()
            .await
            .context("Failed to create branch ref")?;
        ensure_success(resp, "create ref").await?;
        Ok(())
    }

    async fn put_file(
        &self,
        repo: &str,
        branch: &str,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<()> {
        info!(repo, branch, path, "Uploading file content");
        let encoded = STANDARD.encode(content.as_bytes());
        let resp = self
            .http
            .put(format!("{GITHUB_API}/repos/{repo}/contents/{path}"))
            .json(&json!({
                "message": message,
                "content": encoded,
                "branch": branch,
            }))
            .send()
            .await
            .context("Failed to upload file content")?;
        ensure_success(resp, "put contents").await?;
        Ok(())
    }

    async fn open_pr(
        &self,
        repo: &str,
        branch: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<String> {
        info!(repo, branch, base, "Opening pull request");
        let resp = self
            .http
            .post(format!("{GITHUB_API}/repos/{repo}/pulls"))
            .json(&json!({
                "title": title,
                "head": branch,
                "base": base,
                "body": body,
            }))
            .send()
            .await
            .context("Failed to open pull request")?;
        let pr: PullRequest = ensure_success(resp, "create pull")
            .await?
            .json()
            .await
            .context("Failed to parse pull request response")?;
        Ok(pr.html_url)
    }
}
