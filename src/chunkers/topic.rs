use std::sync::Arc;

use crate::models::{Chunk, ChunkType};

/// Splits free text into topically coherent segments
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Returns the whole text as a single segment
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSegmenter;

impl Segmenter for PassthroughSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            vec![]
        } else {
            vec![trimmed.to_string()]
        }
    }
}

/// Chunker for non-transcript content
#[derive(Clone)]
pub struct TopicBoundaryChunker {
    segmenter: Arc<dyn Segmenter>,
}

impl Default for TopicBoundaryChunker {
    fn default() -> Self {
        Self::new(Arc::new(PassthroughSegmenter))
    }
}

impl std::fmt::Debug for TopicBoundaryChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicBoundaryChunker").finish_non_exhaustive()
    }
}

impl TopicBoundaryChunker {
    pub fn new(segmenter: Arc<dyn Segmenter>) -> Self {
        Self { segmenter }
    }

    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.segmenter
            .segment(text)
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| Chunk::new(s, ChunkType::Semantic))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ParagraphSegmenter;

    impl Segmenter for ParagraphSegmenter {
        fn segment(&self, text: &str) -> Vec<String> {
            text.split("\n\n").map(str::to_string).collect()
        }
    }

    #[test]
    fn test_passthrough_yields_single_semantic_chunk() {
        let chunker = TopicBoundaryChunker::default();
        let chunks = chunker.chunk("  Quarterly review notes. Budget is tight.  ");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Quarterly review notes. Budget is tight.");
        assert_eq!(chunks[0].chunk_type, ChunkType::Semantic);
    }

    #[test]
    fn test_blank_text_yields_nothing() {
        let chunker = TopicBoundaryChunker::default();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk(" \n\t ").is_empty());
    }

    #[test]
    fn test_custom_segmenter_drops_blank_segments() {
        let chunker = TopicBoundaryChunker::new(Arc::new(ParagraphSegmenter));
        let chunks = chunker.chunk("First topic.\n\n \n\nSecond topic.");

        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["First topic.", "Second topic."]);
    }
}
