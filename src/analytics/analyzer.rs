use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::analytics::aggregate;
use crate::analytics::health::{health_score, health_status, HealthInputs};
use crate::error::Result;
use crate::github::RepoHost;
use crate::models::report::{
    AnalyticsReport, BasicStats, CommitActivity, HealthReport, IssueAnalytics,
    PullRequestAnalytics,
};
use crate::models::{CommitSummary, Issue, IssueComment, PullRequest, Review};

const COMMIT_WINDOW_DAYS: i64 = 30;
const CONTRIBUTOR_WINDOW_DAYS: i64 = 90;

/// Request-scoped analytics orchestration for one repository.
///
/// Every fetch boundary degrades on failure: the error is logged and the
/// affected section falls back to its empty default, so a report is always
/// produced.
pub struct RepositoryAnalyzer {
    host: Arc<dyn RepoHost>,
    repo: String,
}

struct IssueData {
    issues: Vec<Issue>,
    first_responses: HashMap<u64, DateTime<Utc>>,
    comments: HashMap<u64, Vec<IssueComment>>,
    // False when every per-issue comment listing failed; the response-time
    // average is meaningless then and must not count as a fast turnaround.
    comments_available: bool,
}

struct PullData {
    pulls: Vec<PullRequest>,
    reviews: HashMap<u64, Vec<Review>>,
}

impl RepositoryAnalyzer {
    pub fn new(host: Arc<dyn RepoHost>, repo: impl Into<String>) -> Self {
        Self {
            host,
            repo: repo.into(),
        }
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub async fn comprehensive_report(&self) -> AnalyticsReport {
        let basic_stats = self.fetch_basic_stats().await;
        let commits = self.fetch_commits(COMMIT_WINDOW_DAYS).await;
        let issue_data = self.fetch_issue_data().await;
        let pull_data = self.fetch_pull_data(true).await;
        let contributor_commits = self.fetch_commits(CONTRIBUTOR_WINDOW_DAYS).await;

        let commit_activity = commits.as_deref().map(aggregate::commit_activity);
        let issue_analytics = issue_data
            .as_ref()
            .map(|d| aggregate::issue_analytics(&d.issues, &d.first_responses));
        let pr_analytics = pull_data
            .as_ref()
            .map(|d| aggregate::pull_request_analytics(&d.pulls));

        let score = health_score(&self.health_inputs(
            basic_stats.as_ref(),
            commit_activity.as_ref(),
            issue_analytics.as_ref(),
            pr_analytics.as_ref(),
            issue_data.as_ref().map(|d| d.comments_available).unwrap_or(true),
        ));

        let empty_comments = HashMap::new();
        let empty_reviews = HashMap::new();
        let contributor_activity = aggregate::contributor_activity(
            contributor_commits.as_deref().unwrap_or(&[]),
            issue_data.as_ref().map(|d| d.issues.as_slice()).unwrap_or(&[]),
            issue_data.as_ref().map(|d| &d.comments).unwrap_or(&empty_comments),
            pull_data.as_ref().map(|d| d.pulls.as_slice()).unwrap_or(&[]),
            pull_data.as_ref().map(|d| &d.reviews).unwrap_or(&empty_reviews),
        );

        AnalyticsReport {
            generated_at: Utc::now(),
            repository: self.repo.clone(),
            basic_stats: basic_stats.unwrap_or_default(),
            health_score: score,
            commit_activity: commit_activity.unwrap_or_default(),
            issue_analytics: issue_analytics.unwrap_or_default(),
            pr_analytics: pr_analytics.unwrap_or_default(),
            contributor_activity,
        }
    }

    /// Lighter than the full report: review listings are skipped since the
    /// score does not use them.
    pub async fn health_report(&self) -> HealthReport {
        let basic_stats = self.fetch_basic_stats().await;
        let commits = self.fetch_commits(COMMIT_WINDOW_DAYS).await;
        let issue_data = self.fetch_issue_data().await;
        let pull_data = self.fetch_pull_data(false).await;

        let commit_activity = commits.as_deref().map(aggregate::commit_activity);
        let issue_analytics = issue_data
            .as_ref()
            .map(|d| aggregate::issue_analytics(&d.issues, &d.first_responses));
        let pr_analytics = pull_data
            .as_ref()
            .map(|d| aggregate::pull_request_analytics(&d.pulls));

        let score = health_score(&self.health_inputs(
            basic_stats.as_ref(),
            commit_activity.as_ref(),
            issue_analytics.as_ref(),
            pr_analytics.as_ref(),
            issue_data.as_ref().map(|d| d.comments_available).unwrap_or(true),
        ));

        HealthReport {
            repository: self.repo.clone(),
            health_score: score,
            status: health_status(score).to_string(),
            basic_stats: basic_stats.unwrap_or_default(),
            timestamp: Utc::now(),
        }
    }

    /// Writes the comprehensive report as pretty JSON. Without an explicit
    /// path the filename is timestamped, `analytics_report_%Y%m%d_%H%M%S.json`.
    pub async fn export_json(&self, path: Option<PathBuf>) -> Result<PathBuf> {
        let report = self.comprehensive_report().await;

        let path = path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "analytics_report_{}.json",
                Utc::now().format("%Y%m%d_%H%M%S")
            ))
        });

        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!("Analytics report exported to {}", path.display());

        Ok(path)
    }

    fn health_inputs(
        &self,
        basic: Option<&BasicStats>,
        commits: Option<&CommitActivity>,
        issues: Option<&IssueAnalytics>,
        pulls: Option<&PullRequestAnalytics>,
        comments_available: bool,
    ) -> HealthInputs {
        HealthInputs {
            has_description: basic
                .map(|b| b.description.as_deref().is_some_and(|d| !d.is_empty()))
                .unwrap_or(false),
            stars: basic.map(|b| b.stars).unwrap_or(0),
            forks: basic.map(|b| b.forks).unwrap_or(0),
            recent_commits: commits.map(|c| c.total_commits).unwrap_or(0),
            issue_close_rate: issues.map(|i| i.close_rate).unwrap_or(0.0),
            avg_response_hours: issues
                .filter(|_| comments_available)
                .map(|i| i.avg_response_time_hours),
            pr_merge_rate: pulls.map(|p| p.merge_rate).unwrap_or(0.0),
            avg_merge_hours: pulls.map(|p| p.avg_merge_time_hours),
        }
    }

    async fn fetch_basic_stats(&self) -> Option<BasicStats> {
        match self.host.get_repo(&self.repo).await {
            Ok(repo) => Some(BasicStats {
                name: repo.name,
                full_name: repo.full_name,
                description: repo.description,
                stars: repo.stargazers_count,
                forks: repo.forks_count,
                watchers: repo.watchers_count,
                open_issues: repo.open_issues_count,
                language: repo.language,
                size: repo.size,
                created_at: Some(repo.created_at),
                updated_at: Some(repo.updated_at),
                default_branch: repo.default_branch,
            }),
            Err(err) => {
                tracing::warn!("Failed to fetch basic stats for {}: {}", self.repo, err);
                None
            }
        }
    }

    async fn fetch_commits(&self, days: i64) -> Option<Vec<CommitSummary>> {
        let since = Utc::now() - Duration::days(days);
        match self.host.list_commits_since(&self.repo, since).await {
            Ok(commits) => Some(commits),
            Err(err) => {
                tracing::warn!("Failed to fetch commits for {}: {}", self.repo, err);
                None
            }
        }
    }

    /// Failing to list issues degrades the whole section; failing to list
    /// one issue's comments only drops that issue from the response-time set.
    async fn fetch_issue_data(&self) -> Option<IssueData> {
        let issues = match self.host.list_issues(&self.repo, None).await {
            Ok(issues) => issues,
            Err(err) => {
                tracing::warn!("Failed to fetch issues for {}: {}", self.repo, err);
                return None;
            }
        };

        let mut first_responses = HashMap::new();
        let mut comments = HashMap::new();
        let mut comments_available = issues.is_empty();

        for issue in &issues {
            match self.host.list_issue_comments(&self.repo, issue.number).await {
                Ok(issue_comments) => {
                    comments_available = true;
                    if let Some(first) = issue_comments.first() {
                        first_responses.insert(issue.number, first.created_at);
                    }
                    comments.insert(issue.number, issue_comments);
                }
                Err(err) => {
                    tracing::debug!(
                        "Skipping comments for {}#{}: {}",
                        self.repo,
                        issue.number,
                        err
                    );
                }
            }
        }

        Some(IssueData {
            issues,
            first_responses,
            comments,
            comments_available,
        })
    }

    async fn fetch_pull_data(&self, with_reviews: bool) -> Option<PullData> {
        let pulls = match self.host.list_pulls(&self.repo).await {
            Ok(pulls) => pulls,
            Err(err) => {
                tracing::warn!("Failed to fetch pull requests for {}: {}", self.repo, err);
                return None;
            }
        };

        let mut reviews = HashMap::new();
        if with_reviews {
            for pull in &pulls {
                match self.host.list_pull_reviews(&self.repo, pull.number).await {
                    Ok(pull_reviews) => {
                        reviews.insert(pull.number, pull_reviews);
                    }
                    Err(err) => {
                        tracing::debug!(
                            "Skipping reviews for {}#{}: {}",
                            self.repo,
                            pull.number,
                            err
                        );
                    }
                }
            }
        }

        Some(PullData { pulls, reviews })
    }
}
