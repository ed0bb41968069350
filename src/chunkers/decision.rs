use crate::extractors::keywords::contains_term;
use crate::extractors::money::max_monetary_value;
use crate::models::{Chunk, ChunkType, DecisionAnnotation, DecisionType};

/// Committing language, checked first
const EXPLICIT_PHRASES: &[&str] = &[
    "let's proceed",
    "lets proceed",
    "let's move forward",
    "we'll move forward",
    "move forward with",
    "go ahead with",
    "we approve",
    "approved",
    "signed off",
    "we agree",
    "we've decided",
    "we have decided",
    "ready to sign",
    "final decision",
    "we're going with",
    "let's do it",
];

/// Leaning language
const IMPLICIT_PHRASES: &[&str] = &[
    "sounds good",
    "makes sense",
    "i think we can",
    "leaning towards",
    "leaning toward",
    "seems reasonable",
    "that works",
    "could work",
    "open to",
    "considering",
    "probably",
];

const CONTEXT_KEYWORDS: &[&str] = &[
    "contract",
    "deal",
    "partnership",
    "pricing",
    "implementation",
    "budget",
    "timeline",
    "vendor",
];

const EXPLICIT_CONFIDENCE: f64 = 0.9;
const IMPLICIT_CONFIDENCE: f64 = 0.7;

/// Detects decision language and emits annotated `decision_point` chunks
#[derive(Debug, Clone, Default)]
pub struct DecisionPointChunker {
    annotate_in_place: bool,
}

impl DecisionPointChunker {
    pub fn new(annotate_in_place: bool) -> Self {
        Self { annotate_in_place }
    }

    pub fn detect(&self, text: &str) -> Option<DecisionAnnotation> {
        let lower = text.to_lowercase().replace('\u{2019}', "'");

        let (decision_type, trigger, confidence) = if let Some(p) =
            EXPLICIT_PHRASES.iter().find(|p| contains_term(&lower, p))
        {
            (DecisionType::Explicit, *p, EXPLICIT_CONFIDENCE)
        } else if let Some(p) = IMPLICIT_PHRASES.iter().find(|p| contains_term(&lower, p)) {
            (DecisionType::Implicit, *p, IMPLICIT_CONFIDENCE)
        } else {
            return None;
        };

        let decision_context = CONTEXT_KEYWORDS
            .iter()
            .find(|k| contains_term(&lower, k))
            .copied()
            .unwrap_or("general");

        let estimated_value = max_monetary_value(text).unwrap_or(match decision_context {
            "contract" | "deal" | "partnership" => 50_000.0,
            "pricing" | "implementation" => 25_000.0,
            _ => 5_000.0,
        });

        Some(DecisionAnnotation {
            decision_type,
            decision_context: decision_context.to_string(),
            decision_confidence: confidence,
            estimated_value,
            trigger_phrase: trigger.to_string(),
        })
    }

    /// Annotate every chunk carrying decision language
    ///
    /// By default a matching chunk yields an annotated copy followed by the
    /// untouched original, so the output is never shorter than the input.
    pub fn chunk(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let mut out = Vec::with_capacity(chunks.len());

        for mut chunk in chunks {
            let Some(annotation) = self.detect(&chunk.text) else {
                out.push(chunk);
                continue;
            };

            if self.annotate_in_place {
                chunk.decision = Some(annotation);
                out.push(chunk);
            } else {
                let mut annotated = chunk.clone();
                annotated.chunk_type = ChunkType::DecisionPoint;
                annotated.decision = Some(annotation);
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

    #[test]
    fn test_explicit_decision_on_contract() {
        let chunker = DecisionPointChunker::default();
        let original = Chunk::new("Sounds good, let's proceed with the contract.", ChunkType::Semantic);
        let chunks = chunker.chunk(vec![original.clone()]);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_type, ChunkType::DecisionPoint);
        let decision = chunks[0].decision.as_ref().unwrap();
        assert_eq!(decision.decision_type, DecisionType::Explicit);
        assert_eq!(decision.decision_context, "contract");
        assert_eq!(decision.decision_confidence, 0.9);
        assert_eq!(decision.estimated_value, 50_000.0);
        assert_eq!(decision.trigger_phrase, "let's proceed");

        assert_eq!(chunks[1].chunk_type, ChunkType::Semantic);
        assert_eq!(chunks[1].text, original.text);
        assert!(chunks[1].decision.is_none());
    }

    #[test]
    fn test_implicit_decision_uses_amount() {
        let chunker = DecisionPointChunker::default();
        let decision = chunker
            .detect("That makes sense, the pricing at $12,500 per year fits.")
            .unwrap();

        assert_eq!(decision.decision_type, DecisionType::Implicit);
        assert_eq!(decision.decision_confidence, 0.7);
        assert_eq!(decision.decision_context, "pricing");
        assert_eq!(decision.estimated_value, 12_500.0);
    }

    #[test]
    fn test_default_values_by_context() {
        let chunker = DecisionPointChunker::default();

        let pricing = chunker.detect("We approve the implementation plan.").unwrap();
        assert_eq!(pricing.decision_context, "implementation");
        assert_eq!(pricing.estimated_value, 25_000.0);

        let general = chunker.detect("Approved, thanks everyone.").unwrap();
        assert_eq!(general.decision_context, "general");
        assert_eq!(general.estimated_value, 5_000.0);
    }

    #[test]
    fn test_no_decision_passes_through() {
        let chunker = DecisionPointChunker::default();
        let chunks = chunker.chunk(vec![Chunk::new("The weather is nice today.", ChunkType::Semantic)]);

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].decision.is_none());
    }

    #[test]
    fn test_annotate_in_place_keeps_single_chunk() {
        let chunker = DecisionPointChunker::new(true);
        let chunks = chunker.chunk(vec![
            Chunk::new("Let's move forward with the deal.", ChunkType::SpeakerBoundary).with_speaker("Ann Lee"),
        ]);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_type, ChunkType::SpeakerBoundary);
        assert_eq!(chunks[0].decision.as_ref().unwrap().decision_context, "deal");
    }

    #[test]
    fn test_chunk_count_never_decreases() {
        let chunker = DecisionPointChunker::default();
        let input = vec![
            Chunk::new("Sounds good to me.", ChunkType::Semantic),
            Chunk::new("Nothing to see here.", ChunkType::Semantic),
            Chunk::new("We have decided on the vendor.", ChunkType::Semantic),
        ];
        let n = input.len();
        let out = chunker.chunk(input);

        assert!(out.len() >= n);
        assert_eq!(out.len(), 5);
    }
}
