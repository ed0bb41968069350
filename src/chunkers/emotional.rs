use crate::extractors::keywords::{count_terms, matched_terms};
use crate::models::{Chunk, ChunkType, EmotionAnnotation, EmotionCategory};

fn indicators(category: EmotionCategory) -> &'static [&'static str] {
    match category {
        EmotionCategory::Excitement => &[
            "excited", "exciting", "thrilled", "love", "amazing", "fantastic", "awesome",
            "can't wait", "impressed", "wow",
        ],
        EmotionCategory::Frustration => &[
            "frustrated", "frustrating", "annoyed", "annoying", "fed up", "ridiculous",
            "waste of time", "disappointed", "irritated", "not working",
        ],
        EmotionCategory::Concern => &[
            "concerned", "concern", "worried", "worry", "hesitant", "unsure", "risk", "afraid",
            "nervous", "skeptical",
        ],
        EmotionCategory::Satisfaction => &[
            "satisfied", "happy", "pleased", "glad", "works well", "great job", "appreciate",
            "thankful", "comfortable", "smooth",
        ],
        EmotionCategory::Urgency => &[
            "urgent", "asap", "immediately", "right away", "deadline", "critical",
            "as soon as possible", "time-sensitive", "quickly", "today",
        ],
    }
}

/// Detects emotional language at chunk boundaries
#[derive(Debug, Clone, Default)]
pub struct EmotionalBoundaryChunker {
    annotate_in_place: bool,
}

impl EmotionalBoundaryChunker {
    pub fn new(annotate_in_place: bool) -> Self {
        Self { annotate_in_place }
    }

    /// Score one text; `emotional_shift` is left false
    pub fn detect(&self, text: &str) -> Option<EmotionAnnotation> {
        let lower = text.to_lowercase().replace('\u{2019}', "'");

        let mut primary: Option<(EmotionCategory, usize)> = None;
        let mut total = 0usize;
        let mut found: Vec<String> = Vec::new();

        for category in EmotionCategory::ALL {
            let words = indicators(category);
            let count = count_terms(&lower, words);
            if count == 0 {
                continue;
            }
            total += count;
            found.extend(matched_terms(&lower, words).into_iter().map(str::to_string));
            if primary.is_none_or(|(_, best)| count > best) {
                primary = Some((category, count));
            }
        }

        let (emotional_category, _) = primary?;

        Some(EmotionAnnotation {
            emotional_category,
            emotional_intensity: (total as f64 / 3.0).min(1.0),
            emotional_shift: false,
            emotion_indicators: found,
        })
    }

    /// Annotate every chunk carrying emotional language, in order
    pub fn chunk(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let mut out = Vec::with_capacity(chunks.len());
        let mut previous: Option<EmotionCategory> = None;

        for mut chunk in chunks {
            let Some(mut annotation) = self.detect(&chunk.text) else {
                out.push(chunk);
                continue;
            };

            annotation.emotional_shift =
                previous.is_some_and(|prev| prev != annotation.emotional_category);
            previous = Some(annotation.emotional_category);

            if self.annotate_in_place {
                chunk.emotion = Some(annotation);
                out.push(chunk);
            } else {
                let mut annotated = chunk.clone();
                annotated.chunk_type = ChunkType::EmotionalContext;
                annotated.emotion = Some(annotation);
                out.push(annotated);
                out.push(chunk);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semantic(text: &str) -> Chunk {
        Chunk::new(text, ChunkType::Semantic)
    }

    #[test]
    fn test_detect_primary_and_intensity() {
        let chunker = EmotionalBoundaryChunker::default();
        let emotion = chunker
            .detect("I'm worried about the risk here, but the team is excited.")
            .unwrap();

        assert_eq!(emotion.emotional_category, EmotionCategory::Concern);
        assert_eq!(emotion.emotional_intensity, 1.0);
        assert_eq!(emotion.emotion_indicators, vec!["excited", "worried", "risk"]);
    }

    #[test]
    fn test_ties_go_to_first_category() {
        let chunker = EmotionalBoundaryChunker::default();
        let emotion = chunker.detect("Honestly frustrated, but thrilled with support.").unwrap();

        assert_eq!(emotion.emotional_category, EmotionCategory::Excitement);
        assert!((emotion.emotional_intensity - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_shift_between_matched_chunks() {
        let chunker = EmotionalBoundaryChunker::new(true);
        let chunks = chunker.chunk(vec![
            semantic("We are thrilled with the demo."),
            semantic("Let me check the calendar."),
            semantic("Still thrilled, honestly."),
            semantic("But the deadline is urgent."),
        ]);

        assert_eq!(chunks.len(), 4);
        assert!(!chunks[0].emotion.as_ref().unwrap().emotional_shift);
        assert!(chunks[1].emotion.is_none());
        assert!(!chunks[2].emotion.as_ref().unwrap().emotional_shift);
        assert!(chunks[3].emotion.as_ref().unwrap().emotional_shift);
        assert_eq!(chunks[3].chunk_type, ChunkType::Semantic);
    }

    #[test]
    fn test_duplicates_by_default() {
        let chunker = EmotionalBoundaryChunker::default();
        let chunks = chunker.chunk(vec![semantic("This is so frustrating."), semantic("Okay.")]);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chunk_type, ChunkType::EmotionalContext);
        assert_eq!(
            chunks[0].emotion.as_ref().unwrap().emotional_category,
            EmotionCategory::Frustration
        );
        assert!(chunks[1].emotion.is_none());
        assert_eq!(chunks[1].text, "This is so frustrating.");
    }

    #[test]
    fn test_intensity_bounded() {
        let chunker = EmotionalBoundaryChunker::default();
        let emotion = chunker
            .detect("urgent urgent urgent urgent asap asap critical deadline today")
            .unwrap();

        assert_eq!(emotion.emotional_category, EmotionCategory::Urgency);
        assert!((0.0..=1.0).contains(&emotion.emotional_intensity));
    }
}
