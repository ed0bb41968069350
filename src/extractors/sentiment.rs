use crate::error::PipelineError;
use crate::models::{SentimentLabel, SentimentScore};

use super::keywords::count_terms;
use super::Scorer;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "love", "happy", "pleased", "perfect", "fantastic",
    "wonderful", "helpful", "impressed", "excited", "awesome", "success", "successful",
    "benefit", "valuable", "easy", "thanks", "appreciate", "glad", "best",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "awful", "hate", "problem", "problems", "issue", "issues",
    "difficult", "frustrated", "frustrating", "disappointed", "concerned", "worried",
    "expensive", "slow", "broken", "fail", "failed", "failure", "complaint", "unhappy",
    "cancel", "churn", "worst",
];

const NEUTRAL_WORDS: &[&str] = &[
    "okay", "ok", "fine", "maybe", "perhaps", "average", "standard", "normal", "typical",
    "possibly",
];

/// Emotion word lists in tie-break order
const EMOTIONS: &[(&str, &[&str])] = &[
    ("joy", &["happy", "excited", "thrilled", "delighted", "love", "glad", "awesome"]),
    ("trust", &["trust", "reliable", "confident", "depend", "rely", "honest", "partner"]),
    ("fear", &["worried", "afraid", "concerned", "nervous", "risk", "anxious", "scared"]),
    ("surprise", &["surprised", "unexpected", "wow", "amazing", "shocked", "suddenly"]),
    ("sadness", &["sad", "disappointed", "unfortunately", "sorry", "regret", "miss"]),
    ("anger", &["angry", "frustrated", "furious", "annoyed", "upset", "ridiculous", "unacceptable"]),
];

const POLARITY_THRESHOLD: f64 = 0.2;

/// Bag-of-words sentiment and primary emotion
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze_sentiment(&self, text: &str) -> SentimentScore {
        let lower = text.to_lowercase();

        let positive_count = count_terms(&lower, POSITIVE_WORDS);
        let negative_count = count_terms(&lower, NEGATIVE_WORDS);
        let neutral_count = count_terms(&lower, NEUTRAL_WORDS);
        let total = positive_count + negative_count + neutral_count;

        let score = if total == 0 {
            0.0
        } else {
            (positive_count as f64 - negative_count as f64) / total as f64
        };

        let label = if score > POLARITY_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -POLARITY_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        // First emotion with the highest count wins ties
        let mut primary_emotion = "neutral";
        let mut best = 0usize;
        for &(emotion, words) in EMOTIONS {
            let count = count_terms(&lower, words);
            if count > best {
                best = count;
                primary_emotion = emotion;
            }
        }

        SentimentScore {
            score,
            label,
            primary_emotion: primary_emotion.to_string(),
            emotion_intensity: (best as f64 / 3.0).min(1.0),
            confidence: (total as f64 / 5.0).min(1.0),
            positive_count,
            negative_count,
            neutral_count,
        }
    }
}

impl Scorer for SentimentAnalyzer {
    type Output = SentimentScore;

    fn name(&self) -> &'static str {
        "sentiment"
    }

    fn score(&self, text: &str) -> Result<SentimentScore, PipelineError> {
        Ok(self.analyze_sentiment(text))
    }
}
