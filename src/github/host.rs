//! Narrow capability interface over the repository host.
//!
//! The classifier and analytics core only ever talk to this trait, so they
//! can be exercised against the in-memory fake below without any network.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{CommitSummary, Issue, IssueComment, PullRequest, Repository, Review};

#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    /// Unix timestamp at which the quota window resets.
    pub reset: u64,
}

#[async_trait]
pub trait RepoHost: Send + Sync {
    async fn get_repo(&self, repo: &str) -> Result<Repository>;

    async fn get_issue(&self, repo: &str, number: u64) -> Result<Issue>;

    async fn get_pull(&self, repo: &str, number: u64) -> Result<PullRequest>;

    async fn list_commits_since(
        &self,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitSummary>>;

    /// All issues regardless of state, optionally restricted to those updated
    /// after `since`.
    async fn list_issues(&self, repo: &str, since: Option<DateTime<Utc>>) -> Result<Vec<Issue>>;

    async fn list_pulls(&self, repo: &str) -> Result<Vec<PullRequest>>;

    async fn list_issue_comments(&self, repo: &str, number: u64) -> Result<Vec<IssueComment>>;

    async fn list_pull_reviews(&self, repo: &str, number: u64) -> Result<Vec<Review>>;

    async fn create_label(&self, repo: &str, name: &str, color: &str) -> Result<()>;

    /// Replaces the full label set of an issue or pull request in one write.
    async fn set_labels(&self, repo: &str, number: u64, labels: &[String]) -> Result<()>;

    async fn create_comment(&self, repo: &str, number: u64, body: &str) -> Result<()>;

    async fn get_rate_limit(&self) -> Result<RateLimitInfo>;
}
