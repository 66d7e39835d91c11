use std::collections::HashSet;

use regex::Regex;

use crate::taxonomy::sentiment::{LexiconModel, SentimentModel};
use crate::taxonomy::{LabelTaxonomy, DEFAULT_PR_TYPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
        }
    }
}

/// Result of classifying one issue or pull request. Derived purely from the
/// title and body text; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub issue_type: String,
    pub priority: String,
    pub sentiment: Sentiment,
    pub components: Vec<String>,
}

pub struct IssueClassifier {
    taxonomy: LabelTaxonomy,
    sentiment: Box<dyn SentimentModel>,
    component_patterns: Vec<Regex>,
}

impl IssueClassifier {
    pub fn new() -> Self {
        Self::with_sentiment_model(Box::new(LexiconModel::new()))
    }

    pub fn with_sentiment_model(sentiment: Box<dyn SentimentModel>) -> Self {
        // File paths in backticks for known extensions, then module and
        // component mentions. Pattern order decides component order.
        let patterns = [
            r"(?i)`([^`]+\.py)`",
            r"(?i)`([^`]+\.js)`",
            r"(?i)`([^`]+\.html)`",
            r"(?i)in (\w+) module",
            r"(?i)(\w+) component",
        ];

        let component_patterns = patterns
            .iter()
            .map(|p| Regex::new(p).expect("hardcoded pattern is valid"))
            .collect();

        Self {
            taxonomy: LabelTaxonomy::new(),
            sentiment,
            component_patterns,
        }
    }

    /// Full classification of an issue. Pure and idempotent: the same text
    /// always yields the same result.
    pub fn classify(&self, title: &str, body: &str) -> Classification {
        let combined = format!("{} {}", title, body);

        Classification {
            issue_type: self.classify_type(title, body),
            priority: self.determine_priority(title, body),
            sentiment: self.analyze_sentiment(&combined),
            components: self.extract_components(body),
        }
    }

    /// Picks the category with the strictly highest keyword score. A tie goes
    /// to the category declared first in the taxonomy; no hits at all yields
    /// "general".
    pub fn classify_type(&self, title: &str, body: &str) -> String {
        let text = format!("{} {}", title, body).to_lowercase();

        let mut best = "general";
        let mut best_score = 0usize;

        for category in self.taxonomy.categories() {
            let score = category
                .keywords
                .iter()
                .filter(|keyword| text.contains(*keyword))
                .count();
            if score > best_score {
                best = category.name;
                best_score = score;
            }
        }

        best.to_string()
    }

    /// First priority list with any keyword hit wins, scanned critical first.
    pub fn determine_priority(&self, title: &str, body: &str) -> String {
        let text = format!("{} {}", title, body).to_lowercase();

        for priority in self.taxonomy.priorities() {
            if priority.keywords.iter().any(|keyword| text.contains(keyword)) {
                return priority.name.to_string();
            }
        }

        "medium".to_string()
    }

    pub fn analyze_sentiment(&self, text: &str) -> Sentiment {
        let polarity = self.sentiment.polarity(text);
        if polarity < -0.3 {
            Sentiment::Negative
        } else if polarity > 0.3 {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        }
    }

    /// Captured component mentions, deduplicated case-insensitively while
    /// preserving pattern order, then match order within each pattern.
    pub fn extract_components(&self, body: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut components = Vec::new();

        for pattern in &self.component_patterns {
            for capture in pattern.captures_iter(body) {
                if let Some(group) = capture.get(1) {
                    let value = group.as_str().to_string();
                    if seen.insert(value.to_lowercase()) {
                        components.push(value);
                    }
                }
            }
        }

        components
    }

    /// Keyword-rule PR typing, distinct from the issue taxonomy.
    pub fn classify_pr_type(&self, title: &str, body: &str) -> String {
        let text = format!("{} {}", title, body).to_lowercase();

        for rule in self.taxonomy.pr_types() {
            if rule.keywords.iter().any(|keyword| text.contains(keyword)) {
                return rule.name.to_string();
            }
        }

        DEFAULT_PR_TYPE.to_string()
    }
}

impl Default for IssueClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bug() {
        let classifier = IssueClassifier::new();
        assert_eq!(classifier.classify_type("Bug: crash", "it crashes on click"), "bug");
    }

    #[test]
    fn test_classify_feature() {
        let classifier = IssueClassifier::new();
        assert_eq!(
            classifier.classify_type("Add dark mode", "please add a dark mode feature"),
            "feature"
        );
    }

    #[test]
    fn test_classify_no_keywords_is_general() {
        let classifier = IssueClassifier::new();
        assert_eq!(classifier.classify_type("Something odd", "no relevant words here"), "general");
    }

    #[test]
    fn test_tie_goes_to_first_category() {
        let classifier = IssueClassifier::new();
        // One bug keyword ("crash") and one feature keyword ("implement"):
        // bug is declared first in the taxonomy and wins the tie.
        assert_eq!(classifier.classify_type("crash when we implement it", ""), "bug");
    }

    #[test]
    fn test_priority_urgent_is_critical() {
        let classifier = IssueClassifier::new();
        // "urgent" outranks the low-priority keyword also present.
        assert_eq!(
            classifier.determine_priority("urgent: minor visual glitch", ""),
            "critical"
        );
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        let classifier = IssueClassifier::new();
        assert_eq!(classifier.determine_priority("plain title", "plain body"), "medium");
    }

    #[test]
    fn test_extract_components() {
        let classifier = IssueClassifier::new();
        let body = "Crash in `app.py` and `utils.js`, happens in auth module";
        let components = classifier.extract_components(body);
        assert_eq!(components, vec!["app.py", "utils.js", "auth"]);
    }

    #[test]
    fn test_extract_components_dedup_case_insensitive() {
        let classifier = IssueClassifier::new();
        let body = "see `App.py` and `app.py`";
        let components = classifier.extract_components(body);
        assert_eq!(components, vec!["App.py"]);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = IssueClassifier::new();
        let first = classifier.classify("Bug: crash", "urgent crash in `app.py`");
        let second = classifier.classify("Bug: crash", "urgent crash in `app.py`");
        assert_eq!(first, second);
        assert_eq!(first.issue_type, "bug");
        assert_eq!(first.priority, "critical");
    }

    #[test]
    fn test_pr_type_rules() {
        let classifier = IssueClassifier::new();
        assert_eq!(classifier.classify_pr_type("Fix broken parsing", ""), "bugfix");
        assert_eq!(classifier.classify_pr_type("Update readme", ""), "documentation");
        assert_eq!(classifier.classify_pr_type("Bump versions", ""), "enhancement");
    }
}
