use crate::models::{Chunk, ContextEntry, ConversationContext};

/// Configuration for the context preserver
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Neighbours kept on each side of a chunk
    pub window: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { window: 5 }
    }
}

/// Attaches a sliding window of neighbouring chunks to every chunk
#[derive(Debug, Clone, Default)]
pub struct ContextPreserver {
    config: ContextConfig,
}

impl ContextPreserver {
    pub fn new(config: ContextConfig) -> Self {
        Self { config }
    }

    /// Context for the chunk at `index`, computed from the untouched list
    pub fn context_for(&self, chunks: &[Chunk], index: usize) -> ConversationContext {
        let w = self.config.window;
        let start = index.saturating_sub(w);
        let end = (index + 1 + w).min(chunks.len());

        let before: Vec<ContextEntry> = chunks[start..index].iter().map(project).collect();
        let after: Vec<ContextEntry> = chunks[index + 1..end].iter().map(project).collect();

        let summary = format!(
            "Before: {} | Current: {} | After: {}",
            speaker_list(&before),
            chunks[index].speaker.as_deref().unwrap_or("none"),
            speaker_list(&after)
        );

        ConversationContext {
            before,
            after,
            summary,
        }
    }

    pub fn preserve(&self, mut chunks: Vec<Chunk>) -> Vec<Chunk> {
        let contexts: Vec<ConversationContext> =
            (0..chunks.len()).map(|i| self.context_for(&chunks, i)).collect();

        for (chunk, context) in chunks.iter_mut().zip(contexts) {
            chunk.conversation_context = Some(context);
        }
        chunks
    }
}

fn project(chunk: &Chunk) -> ContextEntry {
    ContextEntry {
        text: chunk.text.clone(),
        speaker: chunk.speaker.clone(),
        chunk_type: chunk.chunk_type.clone(),
    }
}

/// Distinct speakers in order of first appearance, or "none"
fn speaker_list(entries: &[ContextEntry]) -> String {
    let mut speakers: Vec<&str> = Vec::new();
    for speaker in entries.iter().filter_map(|e| e.speaker.as_deref()) {
        if !speakers.contains(&speaker) {
            speakers.push(speaker);
        }
    }

    if speakers.is_empty() {
        "none".to_string()
    } else {
        speakers.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChunkType;

    fn turn(speaker: &str, text: &str) -> Chunk {
        Chunk::new(text, ChunkType::SpeakerBoundary).with_speaker(speaker)
    }

    #[test]
    fn test_summary_format() {
        let chunks = vec![
            turn("Alice", "one"),
            turn("Bob", "two"),
            turn("Alice", "three"),
            turn("Carol", "four"),
            turn("Dave", "five"),
        ];
        let preserver = ContextPreserver::default();
        let context = preserver.context_for(&chunks, 3);

        assert_eq!(context.summary, "Before: Alice, Bob | Current: Carol | After: Dave");
        assert_eq!(context.before.len(), 3);
        assert_eq!(context.after.len(), 1);
    }

    #[test]
    fn test_edges_and_missing_speakers() {
        let chunks = vec![
            Chunk::new("first", ChunkType::Semantic),
            Chunk::new("second", ChunkType::Semantic),
        ];
        let preserver = ContextPreserver::default();

        let first = preserver.context_for(&chunks, 0);
        assert!(first.before.is_empty());
        assert_eq!(first.after[0].text, "second");
        assert_eq!(first.summary, "Before: none | Current: none | After: none");
    }

    #[test]
    fn test_window_is_bounded() {
        let chunks: Vec<Chunk> = (0..20)
            .map(|i| turn(&format!("S{}", i), &format!("text {}", i)))
            .collect();
        let preserver = ContextPreserver::new(ContextConfig { window: 5 });
        let out = preserver.preserve(chunks);

        assert_eq!(out.len(), 20);
        for (i, chunk) in out.iter().enumerate() {
            let context = chunk.conversation_context.as_ref().unwrap();
            assert!(context.before.len() <= 5);
            assert!(context.after.len() <= 5);
            assert_eq!(context.before.len(), i.min(5));
        }
        let middle = out[10].conversation_context.as_ref().unwrap();
        assert_eq!(middle.before[0].text, "text 5");
        assert_eq!(middle.after[4].text, "text 15");
    }

    #[test]
    fn test_empty_input() {
        let preserver = ContextPreserver::default();
        assert!(preserver.preserve(vec![]).is_empty());
    }
}
