use std::collections::BTreeMap;

use crate::error::PipelineError;
use crate::models::TopicClassification;

use super::keywords::distinct_matches;
use super::Scorer;

type Subtopics = &'static [(&'static str, &'static [&'static str])];

/// Topic -> subtopic -> keywords, in tie-break order
const TAXONOMY: &[(&str, Subtopics)] = &[
    (
        "sales",
        &[
            ("prospecting", &["prospect", "lead", "outreach", "cold call", "pipeline"]),
            ("negotiation", &["negotiate", "discount", "terms", "counter offer", "objection"]),
            ("closing", &["close", "signature", "sign", "contract", "deal"]),
            ("demo", &["demo", "walkthrough", "presentation", "trial", "pilot"]),
        ],
    ),
    (
        "technical",
        &[
            ("integration", &["integration", "api", "sync", "webhook", "connector"]),
            ("implementation", &["implementation", "onboarding", "setup", "migration", "rollout"]),
            ("support", &["bug", "error", "outage", "ticket", "troubleshoot"]),
            ("security", &["security", "compliance", "sso", "encryption", "audit"]),
        ],
    ),
    (
        "financial",
        &[
            ("pricing", &["price", "pricing", "quote", "cost", "fee"]),
            ("budget", &["budget", "spend", "funding", "approval", "fiscal"]),
            ("billing", &["invoice", "billing", "payment", "charge", "refund"]),
            ("roi", &["roi", "return on investment", "savings", "payback", "revenue"]),
        ],
    ),
    (
        "operations",
        &[
            ("leasing", &["lease", "leasing", "occupancy", "vacancy", "tour"]),
            ("maintenance", &["maintenance", "work order", "repair", "inspection", "vendor"]),
            ("collections", &["rent", "collection", "delinquency", "late fee", "eviction"]),
            ("staffing", &["staff", "hiring", "training", "turnover", "team"]),
        ],
    ),
];

/// Keyword-count classifier over a fixed sales/technical/financial/operations taxonomy
#[derive(Debug, Clone, Default)]
pub struct HierarchicalTopicClassifier;

impl HierarchicalTopicClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> TopicClassification {
        let lower = text.to_lowercase();

        let scores: Vec<(&str, usize)> = TAXONOMY
            .iter()
            .map(|(topic, subtopics)| {
                let score = subtopics
                    .iter()
                    .map(|(_, keywords)| distinct_matches(&lower, keywords))
                    .sum();
                (*topic, score)
            })
            .collect();

        // Strict comparison keeps the first topic on ties
        let mut winner: Option<(usize, usize)> = None;
        for (i, (_, score)) in scores.iter().enumerate() {
            if *score > 0 && winner.is_none_or(|(_, best)| *score > best) {
                winner = Some((i, *score));
            }
        }

        let topic_scores: BTreeMap<String, usize> = scores
            .iter()
            .map(|(topic, score)| (topic.to_string(), *score))
            .collect();

        let Some((winner_idx, winner_score)) = winner else {
            return TopicClassification {
                topic_scores,
                ..TopicClassification::general()
            };
        };

        let (primary_topic, subtopics) = TAXONOMY[winner_idx];
        let matched_subtopics: Vec<String> = subtopics
            .iter()
            .filter(|(_, keywords)| distinct_matches(&lower, keywords) > 0)
            .map(|(name, _)| name.to_string())
            .collect();

        let mut secondary: Vec<(usize, &str)> = scores
            .iter()
            .enumerate()
            .filter(|(i, (_, score))| *i != winner_idx && *score > 0)
            .map(|(_, (topic, score))| (*score, *topic))
            .collect();
        // sort_by is stable, so equal scores keep taxonomy order
        secondary.sort_by(|a, b| b.0.cmp(&a.0));

        TopicClassification {
            primary_topic: primary_topic.to_string(),
            secondary_topics: secondary.into_iter().map(|(_, t)| t.to_string()).collect(),
            subtopics: matched_subtopics,
            topic_confidence: (winner_score as f64 / 5.0).min(1.0),
            topic_scores,
        }
    }
}

impl Scorer for HierarchicalTopicClassifier {
    type Output = TopicClassification;

    fn name(&self) -> &'static str {
        "topics"
    }

    fn score(&self, text: &str) -> Result<TopicClassification, PipelineError> {
        Ok(self.classify(text))
    }
}
