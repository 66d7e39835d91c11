use std::sync::Arc;

use serde::Deserialize;

use crate::classify::classifier::{Classification, IssueClassifier, Sentiment};
use crate::error::Result;
use crate::github::RepoHost;
use crate::taxonomy::label_color;

/// PR size bands, shared by labeling and the analytics size distribution so
/// the two can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBucket {
    Small,
    Medium,
    Large,
    Xl,
}

impl SizeBucket {
    pub fn label(self) -> &'static str {
        match self {
            SizeBucket::Small => "size:small",
            SizeBucket::Medium => "size:medium",
            SizeBucket::Large => "size:large",
            SizeBucket::Xl => "size:xl",
        }
    }
}

pub fn size_bucket(additions: u32, deletions: u32) -> SizeBucket {
    let total = additions + deletions;
    if total < 20 {
        SizeBucket::Small
    } else if total < 100 {
        SizeBucket::Medium
    } else if total < 500 {
        SizeBucket::Large
    } else {
        SizeBucket::Xl
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueEvent {
    pub action: String,
    pub issue: EventTarget,
    pub repository: EventRepository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: EventTarget,
    pub repository: EventRepository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventTarget {
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    pub full_name: String,
}

/// Computes the label set for a classification: the type label, a priority
/// label unless medium, needs-attention on negative sentiment, and up to the
/// first three component labels.
pub fn label_set(classification: &Classification) -> Vec<String> {
    let mut labels = vec![classification.issue_type.clone()];

    if classification.priority != "medium" {
        labels.push(format!("priority:{}", classification.priority));
    }

    if classification.sentiment == Sentiment::Negative {
        labels.push("needs-attention".to_string());
    }

    for component in classification.components.iter().take(3) {
        labels.push(format!("component:{}", component));
    }

    labels
}

/// Drives the classification pipeline for webhook events: fetch the target
/// from the host, classify, make sure labels exist, replace the label set.
pub struct LabelBot {
    host: Arc<dyn RepoHost>,
    classifier: IssueClassifier,
}

impl LabelBot {
    pub fn new(host: Arc<dyn RepoHost>) -> Self {
        Self {
            host,
            classifier: IssueClassifier::new(),
        }
    }

    pub async fn process_issue_event(&self, event: &IssueEvent) -> Result<()> {
        if event.action != "opened" && event.action != "edited" {
            tracing::debug!("Ignoring issue action: {}", event.action);
            return Ok(());
        }

        let repo = &event.repository.full_name;
        let number = event.issue.number;
        let issue = self.host.get_issue(repo, number).await?;
        let body = issue.body.as_deref().unwrap_or("");

        let classification = self.classifier.classify(&issue.title, body);
        tracing::info!(
            "Classified {}#{} as {} (priority {})",
            repo,
            number,
            classification.issue_type,
            classification.priority
        );

        let labels = label_set(&classification);
        self.ensure_labels(repo, &labels).await;
        self.host.set_labels(repo, number, &labels).await?;

        let comment = build_auto_label_comment(&classification);
        self.host.create_comment(repo, number, &comment).await?;

        Ok(())
    }

    pub async fn process_pull_event(&self, event: &PullRequestEvent) -> Result<()> {
        if event.action != "opened" && event.action != "edited" {
            tracing::debug!("Ignoring pull request action: {}", event.action);
            return Ok(());
        }

        let repo = &event.repository.full_name;
        let number = event.pull_request.number;
        let pull = self.host.get_pull(repo, number).await?;
        let body = pull.body.as_deref().unwrap_or("");

        let pr_type = self.classifier.classify_pr_type(&pull.title, body);
        let size = size_bucket(pull.additions, pull.deletions);
        tracing::info!("Classified PR {}#{} as {} ({})", repo, number, pr_type, size.label());

        let labels = vec![pr_type, size.label().to_string()];
        self.ensure_labels(repo, &labels).await;
        self.host.set_labels(repo, number, &labels).await?;

        Ok(())
    }

    /// Creation failures are swallowed: the label existing is the invariant
    /// that matters, and another actor may have created it concurrently.
    async fn ensure_labels(&self, repo: &str, labels: &[String]) {
        for label in labels {
            let color = label_color(label);
            if let Err(err) = self.host.create_label(repo, label, color).await {
                tracing::debug!("Label '{}' not created ({}), assuming it exists", label, err);
            }
        }
    }
}

fn build_auto_label_comment(classification: &Classification) -> String {
    let mut comment = String::from("🤖 **Auto-labeling complete!**\n\n");
    comment.push_str(&format!("- **Type**: {}\n", classification.issue_type));
    comment.push_str(&format!("- **Priority**: {}\n", classification.priority));

    if !classification.components.is_empty() {
        comment.push_str(&format!(
            "- **Components**: {}\n",
            classification.components.join(", ")
        ));
    }

    comment.push_str(
        "\n*This issue was automatically analyzed and labeled. \
         If you think the labels are incorrect, please feel free to modify them.*",
    );

    comment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::host::fake::FakeHost;
    use crate::models::{Issue, PullRequest};
    use chrono::Utc;

    fn seed_issue(host: &FakeHost, repo: &str, number: u64, title: &str, body: &str) {
        host.issues.lock().unwrap().insert(
            (repo.to_string(), number),
            Issue {
                number,
                title: title.to_string(),
                body: Some(body.to_string()),
                state: "open".to_string(),
                created_at: Utc::now(),
                closed_at: None,
                user: None,
                labels: Vec::new(),
            },
        );
    }

    fn issue_event(repo: &str, number: u64, action: &str) -> IssueEvent {
        IssueEvent {
            action: action.to_string(),
            issue: EventTarget { number },
            repository: EventRepository {
                full_name: repo.to_string(),
            },
        }
    }

    #[test]
    fn test_size_bucket_boundaries() {
        assert_eq!(size_bucket(19, 0), SizeBucket::Small);
        assert_eq!(size_bucket(10, 10), SizeBucket::Medium);
        assert_eq!(size_bucket(99, 0), SizeBucket::Medium);
        assert_eq!(size_bucket(50, 50), SizeBucket::Large);
        assert_eq!(size_bucket(499, 0), SizeBucket::Large);
        assert_eq!(size_bucket(250, 250), SizeBucket::Xl);
    }

    #[test]
    fn test_label_set_skips_medium_priority() {
        let classification = Classification {
            issue_type: "bug".to_string(),
            priority: "medium".to_string(),
            sentiment: Sentiment::Neutral,
            components: Vec::new(),
        };
        assert_eq!(label_set(&classification), vec!["bug"]);
    }

    #[test]
    fn test_label_set_caps_components_at_three() {
        let classification = Classification {
            issue_type: "bug".to_string(),
            priority: "critical".to_string(),
            sentiment: Sentiment::Negative,
            components: vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            ],
        };
        assert_eq!(
            label_set(&classification),
            vec![
                "bug",
                "priority:critical",
                "needs-attention",
                "component:a",
                "component:b",
                "component:c"
            ]
        );
    }

    #[tokio::test]
    async fn test_issue_event_applies_labels_and_comments() {
        let host = Arc::new(FakeHost::default());
        seed_issue(
            &host,
            "owner/repo",
            7,
            "Bug: crash",
            "urgent crash in `app.py` on click",
        );

        let bot = LabelBot::new(host.clone());
        bot.process_issue_event(&issue_event("owner/repo", 7, "opened"))
            .await
            .unwrap();

        let calls = host.set_labels_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (number, labels) = &calls[0];
        assert_eq!(*number, 7);
        assert!(labels.contains(&"bug".to_string()));
        assert!(labels.contains(&"priority:critical".to_string()));
        assert!(labels.contains(&"component:app.py".to_string()));

        let comments = host.comments_posted.lock().unwrap();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].1.contains("**Type**: bug"));
        assert!(comments[0].1.contains("**Priority**: critical"));
    }

    #[tokio::test]
    async fn test_unrelated_action_is_a_no_op() {
        let host = Arc::new(FakeHost::default());
        seed_issue(&host, "owner/repo", 7, "Bug: crash", "boom");

        let bot = LabelBot::new(host.clone());
        bot.process_issue_event(&issue_event("owner/repo", 7, "closed"))
            .await
            .unwrap();

        assert!(host.set_labels_calls.lock().unwrap().is_empty());
        assert!(host.comments_posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_label_creation_failure_is_swallowed() {
        let host = Arc::new(FakeHost::default());
        seed_issue(&host, "owner/repo", 3, "Bug: crash", "it crashes");
        *host.fail_label_creation.lock().unwrap() = true;

        let bot = LabelBot::new(host.clone());
        bot.process_issue_event(&issue_event("owner/repo", 3, "opened"))
            .await
            .unwrap();

        // Labels still applied even though creation failed.
        assert_eq!(host.set_labels_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_pull_event_gets_size_label_and_no_comment() {
        let host = Arc::new(FakeHost::default());
        host.pulls.lock().unwrap().insert(
            ("owner/repo".to_string(), 12),
            PullRequest {
                number: 12,
                title: "Fix broken parser".to_string(),
                body: None,
                state: "open".to_string(),
                created_at: Utc::now(),
                closed_at: None,
                merged_at: None,
                additions: 40,
                deletions: 10,
                user: None,
                labels: Vec::new(),
            },
        );

        let bot = LabelBot::new(host.clone());
        let event = PullRequestEvent {
            action: "opened".to_string(),
            pull_request: EventTarget { number: 12 },
            repository: EventRepository {
                full_name: "owner/repo".to_string(),
            },
        };
        bot.process_pull_event(&event).await.unwrap();

        let calls = host.set_labels_calls.lock().unwrap();
        assert_eq!(calls[0].1, vec!["bugfix", "size:medium"]);
        assert!(host.comments_posted.lock().unwrap().is_empty());
    }
}
