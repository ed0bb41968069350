pub mod business;
pub mod decision_makers;
pub mod keywords;
pub mod money;
pub mod sentiment;
pub mod topics;

pub use business::*;
pub use decision_makers::*;
pub use money::*;
pub use sentiment::*;
pub use topics::*;

use std::sync::Arc;

use crate::error::PipelineError;
use crate::models::{BusinessIntelligence, Enrichment, SentimentScore, TopicClassification};

/// A per-chunk scoring capability
///
/// The shipped implementations are keyword and regex counters; a learned
/// model can stand in for any of them without touching the pipeline.
pub trait Scorer: Send + Sync {
    type Output;

    fn name(&self) -> &'static str;

    fn score(&self, text: &str) -> Result<Self::Output, PipelineError>;
}

pub type SharedScorer<T> = Arc<dyn Scorer<Output = T>>;

/// The four enrichment extractors applied to every chunk
#[derive(Clone)]
pub struct Enrichers {
    pub business: SharedScorer<BusinessIntelligence>,
    pub sentiment: SharedScorer<SentimentScore>,
    pub decision_makers: SharedScorer<Vec<String>>,
    pub topics: SharedScorer<TopicClassification>,
}

impl Default for Enrichers {
    fn default() -> Self {
        Self {
            business: Arc::new(BusinessIntelligenceExtractor::new()),
            sentiment: Arc::new(SentimentAnalyzer::new()),
            decision_makers: Arc::new(DecisionMakerExtractor::new()),
            topics: Arc::new(HierarchicalTopicClassifier::new()),
        }
    }
}

impl std::fmt::Debug for Enrichers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enrichers")
            .field("business", &self.business.name())
            .field("sentiment", &self.sentiment.name())
            .field("decision_makers", &self.decision_makers.name())
            .field("topics", &self.topics.name())
            .finish()
    }
}

impl Enrichers {
    pub fn with_business(mut self, scorer: SharedScorer<BusinessIntelligence>) -> Self {
        self.business = scorer;
        self
    }

    pub fn with_sentiment(mut self, scorer: SharedScorer<SentimentScore>) -> Self {
        self.sentiment = scorer;
        self
    }

    pub fn with_decision_makers(mut self, scorer: SharedScorer<Vec<String>>) -> Self {
        self.decision_makers = scorer;
        self
    }

    pub fn with_topics(mut self, scorer: SharedScorer<TopicClassification>) -> Self {
        self.topics = scorer;
        self
    }

    /// Run all four extractors over one chunk's text, in sequence
    pub fn enrich(&self, text: &str) -> Result<Enrichment, PipelineError> {
        Ok(Enrichment {
            business_intelligence: self.business.score(text)?,
            sentiment: self.sentiment.score(text)?,
            decision_makers: self.decision_makers.score(text)?,
            topics: self.topics.score(text)?,
        })
    }
}
