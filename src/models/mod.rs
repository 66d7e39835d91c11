pub mod commit;
pub mod issue;
pub mod report;

pub use commit::{CommitAuthor, CommitDetails, CommitStats, CommitSummary};
pub use issue::{Account, Issue, IssueComment, Label, PullRequest, Repository, Review};
pub use report::{
    AnalyticsReport, BasicStats, CommitActivity, ContributorStats, HealthReport, IssueAnalytics,
    PullRequestAnalytics,
};
