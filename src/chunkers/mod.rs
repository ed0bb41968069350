pub mod decision;
pub mod emotional;
pub mod speaker;
pub mod topic;

pub use decision::*;
pub use emotional::*;
pub use speaker::*;
pub use topic::*;

use std::sync::Arc;

use tracing::debug;

use crate::models::Chunk;

/// Content type routed to the speaker chunker
pub const TRANSCRIPT_CONTENT_TYPE: &str = "gong_call";

/// Configuration for all boundary chunkers
#[derive(Debug, Clone, Default)]
pub struct BoundaryConfig {
    pub speaker: SpeakerChunkerConfig,
    /// Attach decision/emotion annotations to the chunk itself instead of
    /// emitting an annotated copy next to the original
    pub annotate_in_place: bool,
}

/// The four boundary chunkers, built once per pipeline
#[derive(Debug, Clone)]
pub struct BoundaryChunkers {
    speaker: SpeakerBoundaryChunker,
    topic: TopicBoundaryChunker,
    decision: DecisionPointChunker,
    emotional: EmotionalBoundaryChunker,
}

impl BoundaryChunkers {
    pub fn new(config: &BoundaryConfig) -> Self {
        Self {
            speaker: SpeakerBoundaryChunker::new(config.speaker.clone()),
            topic: TopicBoundaryChunker::default(),
            decision: DecisionPointChunker::new(config.annotate_in_place),
            emotional: EmotionalBoundaryChunker::new(config.annotate_in_place),
        }
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn Segmenter>) -> Self {
        self.topic = TopicBoundaryChunker::new(segmenter);
        self
    }

    /// Split content and run the decision and emotion passes over the result
    ///
    /// Transcripts go through the speaker chunker. A transcript with no
    /// recognisable speaker falls through to the topic chunker so its text
    /// is not lost.
    pub fn chunk(&self, content: &str, content_type: &str) -> Vec<Chunk> {
        let mut chunks = if content_type == TRANSCRIPT_CONTENT_TYPE {
            self.speaker.chunk(content)
        } else {
            vec![]
        };

        if chunks.is_empty() {
            chunks = self.topic.chunk(content);
        }
        let initial = chunks.len();

        let chunks = self.decision.chunk(chunks);
        let after_decision = chunks.len();

        let chunks = self.emotional.chunk(chunks);

        debug!(
            "Boundary chunking: {} initial, {} after decisions, {} after emotions",
            initial,
            after_decision,
            chunks.len()
        );

        chunks
    }
}
