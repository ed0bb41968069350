use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ConversationContext, Enrichment};

/// Kind of chunk, tagged by the stage that produced it
///
/// Stages may introduce new tags; anything unrecognised round-trips through
/// `Other` as its raw string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChunkType {
    /// One speaker turn from a transcript
    SpeakerBoundary,
    /// Annotated copy carrying a detected decision
    DecisionPoint,
    /// Annotated copy carrying a detected emotion
    EmotionalContext,
    /// Segment produced by the topic chunker
    Semantic,
    /// Sentence produced by the fallback path
    Basic,
    Other(String),
}

impl ChunkType {
    pub fn as_str(&self) -> &str {
        match self {
            ChunkType::SpeakerBoundary => "speaker_boundary",
            ChunkType::DecisionPoint => "decision_point",
            ChunkType::EmotionalContext => "emotional_context",
            ChunkType::Semantic => "semantic",
            ChunkType::Basic => "basic",
            ChunkType::Other(tag) => tag,
        }
    }
}

impl From<String> for ChunkType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "speaker_boundary" => ChunkType::SpeakerBoundary,
            "decision_point" => ChunkType::DecisionPoint,
            "emotional_context" => ChunkType::EmotionalContext,
            "semantic" => ChunkType::Semantic,
            "basic" => ChunkType::Basic,
            _ => ChunkType::Other(tag),
        }
    }
}

impl From<ChunkType> for String {
    fn from(chunk_type: ChunkType) -> Self {
        chunk_type.as_str().to_string()
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a speaker label was written in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameType {
    FullName,
    Initials,
    SingleName,
    /// Generic labels such as "Speaker 1" or "Customer"
    RoleLabel,
}

/// Best-effort guess about who a speaker is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerMetadata {
    pub name_type: NameType,
    /// Speaker appears to belong to our own organisation
    pub is_internal: bool,
    pub role: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    /// Committing language ("let's proceed", "approved")
    Explicit,
    /// Leaning language ("sounds good", "makes sense")
    Implicit,
}

/// Fields attached by the decision point chunker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionAnnotation {
    pub decision_type: DecisionType,
    pub decision_context: String,
    pub decision_confidence: f64,
    pub estimated_value: f64,
    pub trigger_phrase: String,
}

/// Emotion categories recognised at chunk boundaries, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionCategory {
    Excitement,
    Frustration,
    Concern,
    Satisfaction,
    Urgency,
}

impl EmotionCategory {
    pub const ALL: [EmotionCategory; 5] = [
        EmotionCategory::Excitement,
        EmotionCategory::Frustration,
        EmotionCategory::Concern,
        EmotionCategory::Satisfaction,
        EmotionCategory::Urgency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionCategory::Excitement => "excitement",
            EmotionCategory::Frustration => "frustration",
            EmotionCategory::Concern => "concern",
            EmotionCategory::Satisfaction => "satisfaction",
            EmotionCategory::Urgency => "urgency",
        }
    }
}

/// Fields attached by the emotional boundary chunker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionAnnotation {
    pub emotional_category: EmotionCategory,
    pub emotional_intensity: f64,
    /// Primary emotion differs from the previous emotional chunk
    pub emotional_shift: bool,
    pub emotion_indicators: Vec<String>,
}

/// The unit of work flowing through the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub speaker: Option<String>,
    pub chunk_type: ChunkType,
    /// Raw transcript lines preceding this turn
    #[serde(default)]
    pub context_before: Vec<String>,
    /// Raw transcript lines following this turn
    #[serde(default)]
    pub context_after: Vec<String>,
    #[serde(default)]
    pub speaker_metadata: Option<SpeakerMetadata>,
    #[serde(default)]
    pub decision: Option<DecisionAnnotation>,
    #[serde(default)]
    pub emotion: Option<EmotionAnnotation>,
    /// Provenance, assigned by the orchestrator
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub chunk_index: usize,
    #[serde(default)]
    pub enrichment: Option<Enrichment>,
    #[serde(default)]
    pub conversation_context: Option<ConversationContext>,
}

impl Chunk {
    pub fn new(text: impl Into<String>, chunk_type: ChunkType) -> Self {
        Self {
            text: text.into(),
            speaker: None,
            chunk_type,
            context_before: vec![],
            context_after: vec![],
            speaker_metadata: None,
            decision: None,
            emotion: None,
            source_id: String::new(),
            content_type: String::new(),
            chunk_index: 0,
            enrichment: None,
            conversation_context: None,
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }
}
