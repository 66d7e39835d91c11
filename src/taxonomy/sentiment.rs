//! Lexicon-based sentiment scoring.
//!
//! The classifier only depends on the `SentimentModel` trait, so the built-in
//! lexicon can be swapped for any other `(text) -> polarity` implementation.

use std::collections::HashMap;

/// Scores text polarity in [-1.0, 1.0].
pub trait SentimentModel: Send + Sync {
    fn polarity(&self, text: &str) -> f32;
}

/// Word-polarity lookup averaged over recognized words. Words outside the
/// lexicon do not affect the score; text with no recognized words is neutral.
pub struct LexiconModel {
    weights: HashMap<&'static str, f32>,
}

impl LexiconModel {
    pub fn new() -> Self {
        let mut weights = HashMap::new();

        let entries: &[(&[&str], f32)] = &[
            (
                &[
                    "love", "excellent", "awesome", "amazing", "great", "fantastic", "perfect",
                    "wonderful", "brilliant",
                ],
                1.0,
            ),
            (
                &[
                    "good", "nice", "thanks", "thank", "helpful", "useful", "appreciate",
                    "clean", "solid", "works", "happy",
                ],
                0.5,
            ),
            (
                &[
                    "bad", "wrong", "annoying", "frustrating", "confusing", "disappointing",
                    "ugly", "messy", "painful",
                ],
                -0.5,
            ),
            (
                &[
                    "terrible", "awful", "horrible", "hate", "worst", "garbage", "useless",
                    "unusable", "unacceptable",
                ],
                -1.0,
            ),
        ];

        for (words, weight) in entries {
            for word in *words {
                weights.insert(*word, *weight);
            }
        }

        Self { weights }
    }
}

impl Default for LexiconModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentModel for LexiconModel {
    fn polarity(&self, text: &str) -> f32 {
        let lower = text.to_lowercase();
        let mut sum = 0.0f32;
        let mut recognized = 0u32;

        for word in lower.split(|c: char| !c.is_alphanumeric()) {
            if let Some(weight) = self.weights.get(word) {
                sum += weight;
                recognized += 1;
            }
        }

        if recognized == 0 {
            return 0.0;
        }

        (sum / recognized as f32).clamp(-1.0, 1.0)
    }
}
