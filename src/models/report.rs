//! Serializable analytics report structures.
//!
//! Field names are the stable contract consumed by dashboards and the JSON
//! export; renaming any of them is a breaking change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BasicStats {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    pub open_issues: u32,
    pub language: Option<String>,
    pub size: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorCommits {
    pub author: String,
    pub commits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub additions: u32,
    pub deletions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommitActivity {
    pub total_commits: u32,
    pub daily_commits: BTreeMap<String, u32>,
    pub top_contributors: Vec<ContributorCommits>,
    pub commit_details: Vec<CommitDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelCount {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MonthlyIssueCounts {
    pub opened: u32,
    pub closed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IssueAnalytics {
    pub total_issues: u32,
    pub open_issues: u32,
    pub closed_issues: u32,
    pub close_rate: f64,
    pub avg_close_time_hours: f64,
    pub avg_response_time_hours: f64,
    pub label_distribution: Vec<LabelCount>,
    pub priority_distribution: Vec<LabelCount>,
    pub issues_by_month: BTreeMap<String, MonthlyIssueCounts>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SizeDistribution {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
    pub xl: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PullRequestAnalytics {
    pub total_prs: u32,
    pub open_prs: u32,
    pub merged_prs: u32,
    pub merge_rate: f64,
    pub avg_merge_time_hours: f64,
    pub pr_size_distribution: SizeDistribution,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContributorStats {
    pub commits: u32,
    pub issues_opened: u32,
    pub issues_commented: u32,
    pub prs_opened: u32,
    pub prs_reviewed: u32,
    pub lines_added: u32,
    pub lines_deleted: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub basic_stats: BasicStats,
    pub health_score: f64,
    pub commit_activity: CommitActivity,
    pub issue_analytics: IssueAnalytics,
    pub pr_analytics: PullRequestAnalytics,
    pub contributor_activity: BTreeMap<String, ContributorStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub repository: String,
    pub health_score: f64,
    pub status: String,
    pub basic_stats: BasicStats,
    pub timestamp: DateTime<Utc>,
}
