use serde::{Deserialize, Serialize};

use super::{
    AgentAction, AgentInsight, BusinessIntelligence, ChunkType, ConversationContext,
    DecisionType, EmotionCategory, SentimentLabel, SpeakerMetadata,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Immediate,
    ShortTerm,
    MediumTerm,
    LongTerm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSensitivity {
    High,
    Medium,
    Low,
}

/// Which code path produced a chunk's metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Deadline-bound enrichment for high priority content
    Realtime,
    Enhanced,
    /// Degraded fallback output
    Basic,
}

impl ProcessingMode {
    /// `"high"` selects realtime processing, anything else enhanced
    pub fn from_priority(priority: &str) -> Self {
        if priority == "high" {
            ProcessingMode::Realtime
        } else {
            ProcessingMode::Enhanced
        }
    }
}

/// Flat record assembled once per chunk at the end of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedMetadata {
    pub chunk_id: String,
    pub source_id: String,
    pub content_type: String,
    pub chunk_index: usize,
    pub chunk_type: ChunkType,
    pub created_timestamp: String,
    pub processing_mode: ProcessingMode,
    pub confidence_score: f64,

    pub speaker: Option<String>,
    pub speaker_metadata: Option<SpeakerMetadata>,

    pub business_intelligence: Option<BusinessIntelligence>,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub primary_emotion: String,
    pub emotion_intensity: f64,
    pub sentiment_confidence: f64,
    pub decision_makers: Vec<String>,
    pub primary_topic: String,
    pub secondary_topics: Vec<String>,
    pub subtopics: Vec<String>,
    pub topic_confidence: f64,

    pub decision_type: Option<DecisionType>,
    pub decision_context: Option<String>,
    pub decision_confidence: Option<f64>,
    pub estimated_value: Option<f64>,

    pub emotional_category: Option<EmotionCategory>,
    pub emotional_intensity: Option<f64>,
    pub emotional_shift: Option<bool>,

    pub conversation_context: Option<ConversationContext>,

    pub urgency_level: UrgencyLevel,
    pub time_sensitivity: TimeSensitivity,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agent_insights: Vec<AgentInsight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agent_actions: Vec<AgentAction>,
}

/// One element of `process_content` output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedChunk {
    pub text: String,
    pub metadata: EnhancedMetadata,
    pub chunk_type: ChunkType,
    pub source_id: String,
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_mode_from_priority() {
        assert_eq!(ProcessingMode::from_priority("high"), ProcessingMode::Realtime);
        assert_eq!(ProcessingMode::from_priority("normal"), ProcessingMode::Enhanced);
        assert_eq!(ProcessingMode::from_priority("HIGH"), ProcessingMode::Enhanced);
    }

    #[test]
    fn test_urgency_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&UrgencyLevel::ShortTerm).unwrap(),
            "\"short_term\""
        );
        assert_eq!(
            serde_json::to_string(&ProcessingMode::Basic).unwrap(),
            "\"basic\""
        );
    }
}
