use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ChunkType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialUrgency {
    High,
    Medium,
    Low,
}

/// Money mentioned in a chunk and what it might be worth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialIntelligence {
    pub monetary_values: Vec<f64>,
    pub total_value: f64,
    pub max_value: f64,
    pub revenue_potential: f64,
    pub financial_keywords: Vec<String>,
    pub urgency: FinancialUrgency,
    pub has_financial_content: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyIntelligence {
    pub category_counts: BTreeMap<String, usize>,
    pub mentioned_technologies: Vec<String>,
    /// Weighted keyword total scaled into [0, 1]
    pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceIntelligence {
    pub category_counts: BTreeMap<String, usize>,
    /// Percentages quoted in the text, e.g. "15%"
    pub metrics: Vec<String>,
    pub impact_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentIndustryIntelligence {
    pub category_scores: BTreeMap<String, f64>,
    pub primary_category: Option<String>,
    pub overall_relevance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityLevel {
    Executive,
    Management,
    None,
}

/// A person or title with buying authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMaker {
    pub name: Option<String>,
    pub title: Option<String>,
}

impl DecisionMaker {
    /// "Name (Title)" when both are known, otherwise whichever is
    pub fn label(&self) -> String {
        match (&self.name, &self.title) {
            (Some(name), Some(title)) => format!("{} ({})", name, title),
            (Some(name), None) => name.clone(),
            (None, Some(title)) => title.clone(),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionMakerIntelligence {
    pub decision_makers: Vec<DecisionMaker>,
    pub has_decision_maker: bool,
    pub authority_level: AuthorityLevel,
}

/// Battery of keyword and regex scores for one chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessIntelligence {
    pub financial: FinancialIntelligence,
    pub technology: TechnologyIntelligence,
    pub performance: PerformanceIntelligence,
    pub apartment_industry: ApartmentIndustryIntelligence,
    pub decision_makers: DecisionMakerIntelligence,
    pub action_items: Vec<String>,
}

impl BusinessIntelligence {
    /// All-zero record used when enrichment is abandoned
    pub fn empty() -> Self {
        Self {
            financial: FinancialIntelligence {
                monetary_values: vec![],
                total_value: 0.0,
                max_value: 0.0,
                revenue_potential: 0.0,
                financial_keywords: vec![],
                urgency: FinancialUrgency::Low,
                has_financial_content: false,
            },
            technology: TechnologyIntelligence {
                category_counts: BTreeMap::new(),
                mentioned_technologies: vec![],
                relevance_score: 0.0,
            },
            performance: PerformanceIntelligence {
                category_counts: BTreeMap::new(),
                metrics: vec![],
                impact_score: 0.0,
            },
            apartment_industry: ApartmentIndustryIntelligence {
                category_scores: BTreeMap::new(),
                primary_category: None,
                overall_relevance: 0.0,
            },
            decision_makers: DecisionMakerIntelligence {
                decision_makers: vec![],
                has_decision_maker: false,
                authority_level: AuthorityLevel::None,
            },
            action_items: vec![],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Polarity in [-1, 1]
    pub score: f64,
    pub label: SentimentLabel,
    pub primary_emotion: String,
    pub emotion_intensity: f64,
    pub confidence: f64,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
}

impl SentimentScore {
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            primary_emotion: "neutral".to_string(),
            emotion_intensity: 0.0,
            confidence: 0.0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicClassification {
    pub primary_topic: String,
    pub secondary_topics: Vec<String>,
    pub subtopics: Vec<String>,
    pub topic_confidence: f64,
    pub topic_scores: BTreeMap<String, usize>,
}

impl TopicClassification {
    pub fn general() -> Self {
        Self {
            primary_topic: "general".to_string(),
            secondary_topics: vec![],
            subtopics: vec![],
            topic_confidence: 0.0,
            topic_scores: BTreeMap::new(),
        }
    }
}

/// Per-chunk output of the four extractors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub business_intelligence: BusinessIntelligence,
    pub sentiment: SentimentScore,
    pub decision_makers: Vec<String>,
    pub topics: TopicClassification,
}

impl Enrichment {
    /// Minimal result returned when realtime enrichment misses its deadline
    pub fn placeholder() -> Self {
        Self {
            business_intelligence: BusinessIntelligence::empty(),
            sentiment: SentimentScore::neutral(),
            decision_makers: vec![],
            topics: TopicClassification::general(),
        }
    }
}

/// Light projection of a neighbouring chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub text: String,
    pub speaker: Option<String>,
    pub chunk_type: ChunkType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub before: Vec<ContextEntry>,
    pub after: Vec<ContextEntry>,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_maker_label() {
        let both = DecisionMaker {
            name: Some("Sarah Chen".to_string()),
            title: Some("CFO".to_string()),
        };
        let title_only = DecisionMaker {
            name: None,
            title: Some("VP of Operations".to_string()),
        };

        assert_eq!(both.label(), "Sarah Chen (CFO)");
        assert_eq!(title_only.label(), "VP of Operations");
    }

    #[test]
    fn test_placeholder_is_neutral() {
        let placeholder = Enrichment::placeholder();

        assert_eq!(placeholder.sentiment.label, SentimentLabel::Neutral);
        assert_eq!(placeholder.topics.primary_topic, "general");
        assert_eq!(placeholder.business_intelligence.technology.relevance_score, 0.0);
        assert!(placeholder.decision_makers.is_empty());
    }
}
