//! Static classification configuration.
//!
//! Categories are held as ordered lists rather than maps so the
//! first-category-wins tie-break is explicit: whichever entry is declared
//! first here wins a score tie, and priority scanning stops at the first
//! list with a hit.

pub mod sentiment;

pub struct Category {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub struct LabelTaxonomy {
    categories: Vec<Category>,
    priorities: Vec<Category>,
    pr_types: Vec<Category>,
}

impl LabelTaxonomy {
    pub fn new() -> Self {
        Self {
            categories: init_issue_categories(),
            priorities: init_priorities(),
            pr_types: init_pr_types(),
        }
    }

    /// Issue categories in declaration (tie-break) order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Priority lists in scan order: critical, high, medium, low.
    pub fn priorities(&self) -> &[Category] {
        &self.priorities
    }

    /// Pull-request type rules in scan order.
    pub fn pr_types(&self) -> &[Category] {
        &self.pr_types
    }
}

impl Default for LabelTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}

fn init_issue_categories() -> Vec<Category> {
    vec![
        Category {
            name: "bug",
            keywords: &["bug", "error", "crash", "broken", "not working", "fail"],
        },
        Category {
            name: "feature",
            keywords: &["feature", "enhancement", "new", "add", "implement"],
        },
        Category {
            name: "documentation",
            keywords: &["doc", "documentation", "readme", "guide", "help"],
        },
        Category {
            name: "question",
            keywords: &["question", "help", "how to", "support"],
        },
        Category {
            name: "performance",
            keywords: &["performance", "slow", "optimization", "speed"],
        },
        Category {
            name: "security",
            keywords: &["security", "vulnerability", "auth", "permission"],
        },
        Category {
            name: "maintenance",
            keywords: &["maintenance", "cleanup", "refactor", "update"],
        },
        Category {
            name: "ci/cd",
            keywords: &["ci", "cd", "build", "deploy", "pipeline", "test"],
        },
    ]
}

fn init_priorities() -> Vec<Category> {
    vec![
        Category {
            name: "critical",
            keywords: &["critical", "urgent", "emergency", "blocking"],
        },
        Category {
            name: "high",
            keywords: &["high", "important", "asap"],
        },
        Category {
            name: "medium",
            keywords: &["medium", "normal"],
        },
        Category {
            name: "low",
            keywords: &["low", "minor", "nice to have"],
        },
    ]
}

fn init_pr_types() -> Vec<Category> {
    vec![
        Category {
            name: "bugfix",
            keywords: &["fix", "bug", "error", "issue"],
        },
        Category {
            name: "feature",
            keywords: &["feat", "feature", "add", "new"],
        },
        Category {
            name: "documentation",
            keywords: &["doc", "documentation", "readme"],
        },
        Category {
            name: "refactor",
            keywords: &["refactor", "cleanup", "improve"],
        },
        Category {
            name: "test",
            keywords: &["test", "testing"],
        },
    ]
}

/// Default type label when a pull request matches no rule.
pub const DEFAULT_PR_TYPE: &str = "enhancement";

/// Label color lookup. Matched on the full label name; unknown labels (for
/// example `component:*`) get the fallback color.
pub fn label_color(name: &str) -> &'static str {
    const FALLBACK: &str = "7057ff";

    match name {
        "bug" => "d73a4a",
        "feature" => "0075ca",
        "documentation" => "0052cc",
        "question" => "d876e3",
        "enhancement" => "a2eeef",
        "priority:critical" => "b60205",
        "priority:high" => "d93f0b",
        "priority:medium" => "fbca04",
        "priority:low" => "0e8a16",
        "needs-attention" => "ff6b6b",
        "size:small" => "c2e0c6",
        "size:medium" => "f9d71c",
        "size:large" => "dfa878",
        "size:xl" => "d73a4a",
        _ => FALLBACK,
    }
}
