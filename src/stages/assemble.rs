use chrono::Utc;
use uuid::Uuid;

use crate::extractors::keywords::contains_term;
use crate::models::{
    Chunk, ChunkType, EnhancedMetadata, Enrichment, ProcessedChunk, ProcessingMode,
    TimeSensitivity, UrgencyLevel,
};

const IMMEDIATE_TERMS: &[&str] = &[
    "urgent",
    "asap",
    "immediately",
    "right away",
    "right now",
    "today",
    "emergency",
    "as soon as possible",
];
const SHORT_TERM_TERMS: &[&str] = &[
    "tomorrow",
    "this week",
    "next week",
    "end of week",
    "by friday",
    "within days",
    "soon",
];
const MEDIUM_TERM_TERMS: &[&str] = &[
    "this month",
    "next month",
    "this quarter",
    "next quarter",
    "in a few weeks",
    "within weeks",
];

const HIGH_SENSITIVITY_TERMS: &[&str] = &[
    "deadline",
    "urgent",
    "asap",
    "critical",
    "expires",
    "expiring",
    "time-sensitive",
    "limited time",
];
const MEDIUM_SENSITIVITY_TERMS: &[&str] = &[
    "soon",
    "upcoming",
    "schedule",
    "timeline",
    "follow up",
    "next steps",
];

pub fn urgency_level(text: &str) -> UrgencyLevel {
    let lower = text.to_lowercase();
    let any = |terms: &[&str]| terms.iter().any(|t| contains_term(&lower, t));

    if any(IMMEDIATE_TERMS) {
        UrgencyLevel::Immediate
    } else if any(SHORT_TERM_TERMS) {
        UrgencyLevel::ShortTerm
    } else if any(MEDIUM_TERM_TERMS) {
        UrgencyLevel::MediumTerm
    } else {
        UrgencyLevel::LongTerm
    }
}

pub fn time_sensitivity(text: &str) -> TimeSensitivity {
    let lower = text.to_lowercase();
    let any = |terms: &[&str]| terms.iter().any(|t| contains_term(&lower, t));

    if any(HIGH_SENSITIVITY_TERMS) {
        TimeSensitivity::High
    } else if any(MEDIUM_SENSITIVITY_TERMS) {
        TimeSensitivity::Medium
    } else {
        TimeSensitivity::Low
    }
}

/// Builds the flat `EnhancedMetadata` record for each chunk
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataAssembler;

impl MetadataAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, chunk: Chunk, mode: ProcessingMode) -> ProcessedChunk {
        let enrichment = chunk.enrichment.clone().unwrap_or_else(Enrichment::placeholder);
        let Enrichment {
            business_intelligence,
            sentiment,
            decision_makers,
            topics,
        } = enrichment;

        let mut confidence_score = (sentiment.confidence + topics.topic_confidence) / 2.0;
        if let Some(decision) = &chunk.decision {
            confidence_score = confidence_score.max(decision.decision_confidence);
        }

        let metadata = EnhancedMetadata {
            chunk_id: Uuid::new_v4().to_string(),
            source_id: chunk.source_id.clone(),
            content_type: chunk.content_type.clone(),
            chunk_index: chunk.chunk_index,
            chunk_type: chunk.chunk_type.clone(),
            created_timestamp: Utc::now().to_rfc3339(),
            processing_mode: mode,
            confidence_score,

            speaker: chunk.speaker.clone(),
            speaker_metadata: chunk.speaker_metadata.clone(),

            business_intelligence: Some(business_intelligence),
            sentiment_score: sentiment.score,
            sentiment_label: sentiment.label,
            primary_emotion: sentiment.primary_emotion,
            emotion_intensity: sentiment.emotion_intensity,
            sentiment_confidence: sentiment.confidence,
            decision_makers,
            primary_topic: topics.primary_topic,
            secondary_topics: topics.secondary_topics,
            subtopics: topics.subtopics,
            topic_confidence: topics.topic_confidence,

            decision_type: chunk.decision.as_ref().map(|d| d.decision_type),
            decision_context: chunk.decision.as_ref().map(|d| d.decision_context.clone()),
            decision_confidence: chunk.decision.as_ref().map(|d| d.decision_confidence),
            estimated_value: chunk.decision.as_ref().map(|d| d.estimated_value),

            emotional_category: chunk.emotion.as_ref().map(|e| e.emotional_category),
            emotional_intensity: chunk.emotion.as_ref().map(|e| e.emotional_intensity),
            emotional_shift: chunk.emotion.as_ref().map(|e| e.emotional_shift),

            conversation_context: chunk.conversation_context.clone(),

            urgency_level: urgency_level(&chunk.text),
            time_sensitivity: time_sensitivity(&chunk.text),

            agent_insights: vec![],
            agent_actions: vec![],
        };

        ProcessedChunk {
            chunk_type: chunk.chunk_type,
            source_id: chunk.source_id,
            content_type: chunk.content_type,
            text: chunk.text,
            metadata,
        }
    }

    /// Minimal record for fallback output
    pub fn basic(&self, text: &str, index: usize, source_id: &str, content_type: &str) -> ProcessedChunk {
        let mut chunk = Chunk::new(text, ChunkType::Basic);
        chunk.source_id = source_id.to_string();
        chunk.content_type = content_type.to_string();
        chunk.chunk_index = index;

        let mut processed = self.assemble(chunk, ProcessingMode::Basic);
        processed.metadata.business_intelligence = None;
        processed
    }
}
