//! Composite repository health score.
//!
//! Total function: every input degrades independently, the result is always
//! in [0, 100]. `None` for an average means the underlying fetch failed and
//! that signal contributes nothing; `Some(0.0)` means the fetch succeeded
//! with an empty subset, which counts as a fast turnaround.

#[derive(Debug, Clone, Default)]
pub struct HealthInputs {
    pub has_description: bool,
    pub stars: u32,
    pub forks: u32,
    /// Commit count over the last 30 days.
    pub recent_commits: u32,
    /// Issue close rate in percent.
    pub issue_close_rate: f64,
    /// Mean hours to first comment on an issue.
    pub avg_response_hours: Option<f64>,
    /// PR merge rate in percent.
    pub pr_merge_rate: f64,
    /// Mean hours from PR creation to merge.
    pub avg_merge_hours: Option<f64>,
}

pub fn health_score(inputs: &HealthInputs) -> f64 {
    let mut score = 0.0;

    // Basic repo metrics
    if inputs.has_description {
        score += 5.0;
    }
    if inputs.stars > 10 {
        score += 5.0;
    }
    if inputs.forks > 5 {
        score += 5.0;
    }

    // Recent activity, one point per commit up to 15
    score += (inputs.recent_commits as f64).min(15.0);

    // Issue management
    score += (inputs.issue_close_rate * 0.15).min(15.0);
    if let Some(response_hours) = inputs.avg_response_hours {
        if response_hours < 24.0 {
            score += 10.0;
        } else if response_hours < 72.0 {
            score += 5.0;
        }
    }

    // PR management
    score += (inputs.pr_merge_rate * 0.1).min(10.0);
    if let Some(merge_hours) = inputs.avg_merge_hours {
        if merge_hours < 48.0 {
            score += 10.0;
        } else if merge_hours < 168.0 {
            score += 5.0;
        }
    }

    score.clamp(0.0, 100.0)
}

/// Display bucket, not part of the score itself.
pub fn health_status(score: f64) -> &'static str {
    if score >= 90.0 {
        "excellent"
    } else if score >= 75.0 {
        "good"
    } else if score >= 60.0 {
        "fair"
    } else {
        "poor"
    }
}
