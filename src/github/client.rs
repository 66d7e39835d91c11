use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::github::host::{RateLimitInfo, RepoHost};
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::RateLimiter;
use crate::models::{CommitSummary, Issue, IssueComment, PullRequest, Repository, Review};

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("repoassist/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            base_url: "https://api.github.com".to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.rate_limiter.wait().await;
        let response = self.client.get(url).send().await?;
        self.rate_limiter.update_from_response(&response);

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "GET {} failed: {} - {}",
                url, status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn get_repo(&self, repo: &str) -> Result<Repository> {
        self.rate_limiter.wait().await;
        let url = format!("{}/repos/{}", self.base_url, repo);
        tracing::debug!("Fetching repository: {}", repo);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(&response);

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::RepoNotFound(repo.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to fetch repo {}: {} - {}",
                repo, status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn get_issue(&self, repo: &str, number: u64) -> Result<Issue> {
        self.rate_limiter.wait().await;
        let url = format!("{}/repos/{}/issues/{}", self.base_url, repo, number);
        tracing::debug!("Fetching issue: {}#{}", repo, number);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(&response);

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::IssueNotFound(repo.to_string(), number));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to fetch issue {}#{}: {} - {}",
                repo, number, status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn get_pull(&self, repo: &str, number: u64) -> Result<PullRequest> {
        self.rate_limiter.wait().await;
        let url = format!("{}/repos/{}/pulls/{}", self.base_url, repo, number);
        tracing::debug!("Fetching pull request: {}#{}", repo, number);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(&response);

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::IssueNotFound(repo.to_string(), number));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to fetch PR {}#{}: {} - {}",
                repo, number, status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn list_commits_since(
        &self,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitSummary>> {
        let url = format!(
            "{}/repos/{}/commits?since={}",
            self.base_url,
            repo,
            since.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        tracing::debug!("Fetching commits for {} since {}", repo, since);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        paginator.fetch_all(&url, 100).await
    }

    async fn list_issues(&self, repo: &str, since: Option<DateTime<Utc>>) -> Result<Vec<Issue>> {
        let mut url = format!("{}/repos/{}/issues?state=all", self.base_url, repo);
        if let Some(since) = since {
            url.push_str(&format!(
                "&since={}",
                since.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
        }
        tracing::debug!("Fetching issues for {}", repo);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        paginator.fetch_all(&url, 100).await
    }

    async fn list_pulls(&self, repo: &str) -> Result<Vec<PullRequest>> {
        let url = format!("{}/repos/{}/pulls?state=all", self.base_url, repo);
        tracing::debug!("Fetching pull requests for {}", repo);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        paginator.fetch_all(&url, 100).await
    }

    async fn list_issue_comments(&self, repo: &str, number: u64) -> Result<Vec<IssueComment>> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.base_url, repo, number
        );
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        paginator.fetch_all(&url, 100).await
    }

    async fn list_pull_reviews(&self, repo: &str, number: u64) -> Result<Vec<Review>> {
        let url = format!("{}/repos/{}/pulls/{}/reviews", self.base_url, repo, number);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        paginator.fetch_all(&url, 100).await
    }

    async fn create_label(&self, repo: &str, name: &str, color: &str) -> Result<()> {
        self.rate_limiter.wait().await;
        let url = format!("{}/repos/{}/labels", self.base_url, repo);
        tracing::debug!("Creating label '{}' on {}", name, repo);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "name": name, "color": color }))
            .send()
            .await?;
        self.rate_limiter.update_from_response(&response);

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to create label '{}': {} - {}",
                name, status, body
            )));
        }

        Ok(())
    }

    async fn set_labels(&self, repo: &str, number: u64, labels: &[String]) -> Result<()> {
        self.rate_limiter.wait().await;
        let url = format!(
            "{}/repos/{}/issues/{}/labels",
            self.base_url, repo, number
        );
        tracing::debug!("Setting labels on {}#{}: {:?}", repo, number, labels);

        let response = self
            .client
            .put(&url)
            .json(&json!({ "labels": labels }))
            .send()
            .await?;
        self.rate_limiter.update_from_response(&response);

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to set labels on {}#{}: {} - {}",
                repo, number, status, body
            )));
        }

        Ok(())
    }

    async fn create_comment(&self, repo: &str, number: u64, body: &str) -> Result<()> {
        self.rate_limiter.wait().await;
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.base_url, repo, number
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({ "body": body }))
            .send()
            .await?;
        self.rate_limiter.update_from_response(&response);

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to comment on {}#{}: {} - {}",
                repo, number, status, text
            )));
        }

        Ok(())
    }

    async fn get_rate_limit(&self) -> Result<RateLimitInfo> {
        #[derive(Deserialize)]
        struct RateLimitResponse {
            resources: RateLimitResources,
        }
        #[derive(Deserialize)]
        struct RateLimitResources {
            core: CoreLimit,
        }
        #[derive(Deserialize)]
        struct CoreLimit {
            limit: u32,
            remaining: u32,
            reset: u64,
        }

        let url = format!("{}/rate_limit", self.base_url);
        let parsed: RateLimitResponse = self.get_json(&url).await?;

        Ok(RateLimitInfo {
            limit: parsed.resources.core.limit,
            remaining: parsed.resources.core.remaining,
            reset: parsed.resources.core.reset,
        })
    }
}
