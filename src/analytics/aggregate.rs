//! Pure aggregation folds over host-provided record sequences.
//!
//! Everything here is deterministic: input order is preserved, "top N"
//! rankings use stable sorts so ties keep input order, and averages over
//! empty subsets yield 0 instead of dividing by zero.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::classify::{size_bucket, SizeBucket};
use crate::models::report::{
    CommitActivity, CommitDetail, ContributorCommits, ContributorStats, IssueAnalytics,
    LabelCount, MonthlyIssueCounts, PullRequestAnalytics, SizeDistribution,
};
use crate::models::{CommitSummary, Issue, IssueComment, PullRequest, Review};

const TOP_CONTRIBUTORS: usize = 10;
const TOP_LABELS: usize = 10;
const COMMIT_DETAIL_LIMIT: usize = 50;
const COMMIT_MESSAGE_LIMIT: usize = 100;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

/// Counts occurrences of keys preserving first-seen order, then ranks by
/// count descending with a stable sort.
fn ranked_counts(keys: impl Iterator<Item = String>) -> Vec<(String, u32)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, u32)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn commit_activity(commits: &[CommitSummary]) -> CommitActivity {
    let mut daily_commits: BTreeMap<String, u32> = BTreeMap::new();

    for commit in commits {
        let day = commit.commit.author.date.format("%Y-%m-%d").to_string();
        *daily_commits.entry(day).or_insert(0) += 1;
    }

    let top_contributors = ranked_counts(
        commits
            .iter()
            .map(|c| c.commit.author.name.clone()),
    )
    .into_iter()
    .take(TOP_CONTRIBUTORS)
    .map(|(author, commits)| ContributorCommits { author, commits })
    .collect();

    let commit_details = commits
        .iter()
        .take(COMMIT_DETAIL_LIMIT)
        .map(|c| {
            let first_line = c.commit.message.lines().next().unwrap_or("");
            CommitDetail {
                sha: c.sha.chars().take(7).collect(),
                message: first_line.chars().take(COMMIT_MESSAGE_LIMIT).collect(),
                author: c.commit.author.name.clone(),
                date: c.commit.author.date,
                additions: c.stats.as_ref().map(|s| s.additions).unwrap_or(0),
                deletions: c.stats.as_ref().map(|s| s.deletions).unwrap_or(0),
            }
        })
        .collect();

    CommitActivity {
        total_commits: commits.len() as u32,
        daily_commits,
        top_contributors,
        commit_details,
    }
}

/// `first_responses` maps issue number to the timestamp of its first comment;
/// issues without an entry do not contribute to the response-time average.
pub fn issue_analytics(
    issues: &[Issue],
    first_responses: &HashMap<u64, DateTime<Utc>>,
) -> IssueAnalytics {
    let open = issues.iter().filter(|i| i.is_open()).count() as u32;
    let closed = issues.iter().filter(|i| i.is_closed()).count() as u32;
    let total = issues.len() as u32;

    let close_rate = if total > 0 {
        closed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let close_times: Vec<f64> = issues
        .iter()
        .filter(|i| i.is_closed())
        .filter_map(|i| i.closed_at.map(|t| hours_between(i.created_at, t)))
        .collect();

    let response_times: Vec<f64> = issues
        .iter()
        .filter_map(|i| {
            first_responses
                .get(&i.number)
                .map(|t| hours_between(i.created_at, *t))
        })
        .collect();

    let label_distribution: Vec<LabelCount> = ranked_counts(
        issues
            .iter()
            .flat_map(|i| i.labels.iter().map(|l| l.name.clone())),
    )
    .into_iter()
    .take(TOP_LABELS)
    .map(|(name, count)| LabelCount { name, count })
    .collect();

    let priority_distribution: Vec<LabelCount> = ranked_counts(
        issues
            .iter()
            .flat_map(|i| i.labels.iter().map(|l| l.name.clone()))
            .filter(|name| name.starts_with("priority:")),
    )
    .into_iter()
    .map(|(name, count)| LabelCount { name, count })
    .collect();

    let mut issues_by_month: BTreeMap<String, MonthlyIssueCounts> = BTreeMap::new();
    for issue in issues {
        let created_month = issue.created_at.format("%Y-%m").to_string();
        issues_by_month.entry(created_month).or_default().opened += 1;

        if let Some(closed_at) = issue.closed_at {
            let closed_month = closed_at.format("%Y-%m").to_string();
            issues_by_month.entry(closed_month).or_default().closed += 1;
        }
    }

    IssueAnalytics {
        total_issues: total,
        open_issues: open,
        closed_issues: closed,
        close_rate,
        avg_close_time_hours: mean(&close_times),
        avg_response_time_hours: mean(&response_times),
        label_distribution,
        priority_distribution,
        issues_by_month,
    }
}

pub fn pull_request_analytics(pulls: &[PullRequest]) -> PullRequestAnalytics {
    let total = pulls.len() as u32;
    let open = pulls.iter().filter(|p| p.is_open()).count() as u32;
    let merged = pulls.iter().filter(|p| p.is_merged()).count() as u32;

    let merge_rate = if total > 0 {
        merged as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let merge_times: Vec<f64> = pulls
        .iter()
        .filter_map(|p| p.merged_at.map(|t| hours_between(p.created_at, t)))
        .collect();

    let mut pr_size_distribution = SizeDistribution::default();
    for pull in pulls {
        match size_bucket(pull.additions, pull.deletions) {
            SizeBucket::Small => pr_size_distribution.small += 1,
            SizeBucket::Medium => pr_size_distribution.medium += 1,
            SizeBucket::Large => pr_size_distribution.large += 1,
            SizeBucket::Xl => pr_size_distribution.xl += 1,
        }
    }

    PullRequestAnalytics {
        total_prs: total,
        open_prs: open,
        merged_prs: merged,
        merge_rate,
        avg_merge_time_hours: mean(&merge_times),
        pr_size_distribution,
    }
}

/// Composite per-contributor tallies over commits, issues (plus their
/// comments), and pull requests (plus their reviews).
pub fn contributor_activity(
    commits: &[CommitSummary],
    issues: &[Issue],
    issue_comments: &HashMap<u64, Vec<IssueComment>>,
    pulls: &[PullRequest],
    pull_reviews: &HashMap<u64, Vec<Review>>,
) -> BTreeMap<String, ContributorStats> {
    let mut stats: BTreeMap<String, ContributorStats> = BTreeMap::new();

    for commit in commits {
        let entry = stats.entry(commit.commit.author.name.clone()).or_default();
        entry.commits += 1;
        if let Some(commit_stats) = &commit.stats {
            entry.lines_added += commit_stats.additions;
            entry.lines_deleted += commit_stats.deletions;
        }
    }

    for issue in issues {
        let author = issue
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        stats.entry(author).or_default().issues_opened += 1;

        if let Some(comments) = issue_comments.get(&issue.number) {
            for comment in comments {
                let commenter = comment
                    .user
                    .as_ref()
                    .map(|u| u.login.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                stats.entry(commenter).or_default().issues_commented += 1;
            }
        }
    }

    for pull in pulls {
        let author = pull
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        stats.entry(author).or_default().prs_opened += 1;

        if let Some(reviews) = pull_reviews.get(&pull.number) {
            for review in reviews {
                let reviewer = review
                    .user
                    .as_ref()
                    .map(|u| u.login.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                stats.entry(reviewer).or_default().prs_reviewed += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::commit::{CommitAuthor, CommitDetails, CommitStats};
    use crate::models::issue::{Account, Label};
    use chrono::TimeZone;

    fn commit(sha: &str, author: &str, date: DateTime<Utc>) -> CommitSummary {
        CommitSummary {
            sha: sha.to_string(),
            commit: CommitDetails {
                message: format!("commit by {}", author),
                author: CommitAuthor {
                    name: author.to_string(),
                    date,
                },
            },
            author: None,
            stats: Some(CommitStats {
                additions: 10,
                deletions: 5,
                total: 15,
            }),
        }
    }

    fn issue(
        number: u64,
        state: &str,
        created: DateTime<Utc>,
        closed: Option<DateTime<Utc>>,
        labels: &[&str],
    ) -> Issue {
        Issue {
            number,
            title: format!("issue {}", number),
            body: None,
            state: state.to_string(),
            created_at: created,
            closed_at: closed,
            user: Some(Account {
                login: "alice".to_string(),
            }),
            labels: labels
                .iter()
                .map(|n| Label {
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_inputs_yield_zeroes() {
        let issues = issue_analytics(&[], &HashMap::new());
        assert_eq!(issues.total_issues, 0);
        assert_eq!(issues.close_rate, 0.0);
        assert_eq!(issues.avg_close_time_hours, 0.0);
        assert_eq!(issues.avg_response_time_hours, 0.0);

        let prs = pull_request_analytics(&[]);
        assert_eq!(prs.merge_rate, 0.0);
        assert_eq!(prs.avg_merge_time_hours, 0.0);

        let commits = commit_activity(&[]);
        assert_eq!(commits.total_commits, 0);
        assert!(commits.daily_commits.is_empty());
    }

    #[test]
    fn test_commit_activity_daily_and_top() {
        let commits = vec![
            commit("aaaaaaaa1", "alice", ts(2026, 8, 1, 10)),
            commit("bbbbbbbb2", "bob", ts(2026, 8, 1, 11)),
            commit("cccccccc3", "alice", ts(2026, 8, 2, 9)),
        ];
        let activity = commit_activity(&commits);

        assert_eq!(activity.total_commits, 3);
        assert_eq!(activity.daily_commits["2026-08-01"], 2);
        assert_eq!(activity.daily_commits["2026-08-02"], 1);
        assert_eq!(activity.top_contributors[0].author, "alice");
        assert_eq!(activity.top_contributors[0].commits, 2);
        assert_eq!(activity.commit_details[0].sha, "aaaaaaa");
    }

    #[test]
    fn test_top_contributor_ties_keep_input_order() {
        let commits = vec![
            commit("a1", "carol", ts(2026, 8, 1, 1)),
            commit("a2", "dave", ts(2026, 8, 1, 2)),
        ];
        let activity = commit_activity(&commits);
        assert_eq!(activity.top_contributors[0].author, "carol");
        assert_eq!(activity.top_contributors[1].author, "dave");
    }

    #[test]
    fn test_issue_close_rate_and_times() {
        let created = ts(2026, 8, 1, 0);
        let issues = vec![
            issue(1, "closed", created, Some(ts(2026, 8, 1, 12)), &["bug"]),
            issue(2, "open", created, None, &["bug", "priority:high"]),
        ];
        let mut responses = HashMap::new();
        responses.insert(1, ts(2026, 8, 1, 6));

        let analytics = issue_analytics(&issues, &responses);
        assert_eq!(analytics.total_issues, 2);
        assert_eq!(analytics.closed_issues, 1);
        assert_eq!(analytics.close_rate, 50.0);
        assert_eq!(analytics.avg_close_time_hours, 12.0);
        assert_eq!(analytics.avg_response_time_hours, 6.0);
        assert_eq!(analytics.label_distribution[0].name, "bug");
        assert_eq!(analytics.label_distribution[0].count, 2);
        assert_eq!(analytics.priority_distribution[0].name, "priority:high");
    }

    #[test]
    fn test_issues_by_month_buckets() {
        let issues = vec![
            issue(1, "closed", ts(2026, 7, 15, 0), Some(ts(2026, 8, 2, 0)), &[]),
            issue(2, "open", ts(2026, 8, 10, 0), None, &[]),
        ];
        let analytics = issue_analytics(&issues, &HashMap::new());

        assert_eq!(analytics.issues_by_month["2026-07"].opened, 1);
        assert_eq!(analytics.issues_by_month["2026-08"].opened, 1);
        assert_eq!(analytics.issues_by_month["2026-08"].closed, 1);
    }

    #[test]
    fn test_pr_size_distribution_shares_banding() {
        let mut pull = PullRequest {
            number: 1,
            title: "pr".to_string(),
            body: None,
            state: "open".to_string(),
            created_at: ts(2026, 8, 1, 0),
            closed_at: None,
            merged_at: None,
            additions: 19,
            deletions: 0,
            user: None,
            labels: Vec::new(),
        };
        let mut pulls = vec![pull.clone()];
        pull.number = 2;
        pull.additions = 500;
        pulls.push(pull);

        let analytics = pull_request_analytics(&pulls);
        assert_eq!(analytics.pr_size_distribution.small, 1);
        assert_eq!(analytics.pr_size_distribution.xl, 1);
        assert_eq!(analytics.merge_rate, 0.0);
    }

    #[test]
    fn test_contributor_activity_tallies() {
        let commits = vec![commit("a1", "alice", ts(2026, 8, 1, 0))];
        let issues = vec![issue(1, "open", ts(2026, 8, 1, 0), None, &[])];
        let mut comments = HashMap::new();
        comments.insert(
            1,
            vec![IssueComment {
                user: Some(Account {
                    login: "bob".to_string(),
                }),
                created_at: ts(2026, 8, 1, 1),
            }],
        );
        let pulls = vec![PullRequest {
            number: 9,
            title: "pr".to_string(),
            body: None,
            state: "open".to_string(),
            created_at: ts(2026, 8, 1, 0),
            closed_at: None,
            merged_at: None,
            additions: 0,
            deletions: 0,
            user: Some(Account {
                login: "bob".to_string(),
            }),
            labels: Vec::new(),
        }];
        let mut reviews = HashMap::new();
        reviews.insert(
            9,
            vec![Review {
                user: Some(Account {
                    login: "alice".to_string(),
                }),
                submitted_at: None,
            }],
        );

        let stats = contributor_activity(&commits, &issues, &comments, &pulls, &reviews);

        assert_eq!(stats["alice"].commits, 1);
        assert_eq!(stats["alice"].lines_added, 10);
        assert_eq!(stats["alice"].issues_opened, 1);
        assert_eq!(stats["alice"].prs_reviewed, 1);
        assert_eq!(stats["bob"].issues_commented, 1);
        assert_eq!(stats["bob"].prs_opened, 1);
    }
}
