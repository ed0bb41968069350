use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::agents::{AgentIntegration, NotificationSink};
use crate::chunkers::{BoundaryChunkers, Segmenter};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::extractors::Enrichers;
use crate::models::{Chunk, Enrichment, ProcessedChunk, ProcessingMode};

use super::{ContextPreserver, MetadataAssembler, RealtimeProcessor};

/// The full chunking and enrichment pipeline, built once and reused
#[derive(Debug)]
pub struct SophiaChunkingPipeline {
    chunkers: BoundaryChunkers,
    enrichers: Enrichers,
    realtime: RealtimeProcessor,
    context: ContextPreserver,
    assembler: MetadataAssembler,
    agents: AgentIntegration,
}

impl SophiaChunkingPipeline {
    /// Fails only when the webhook client cannot be built
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let enrichers = Enrichers::default();
        Ok(Self {
            chunkers: BoundaryChunkers::new(&config.boundary()),
            realtime: RealtimeProcessor::new(enrichers.clone(), config.realtime()),
            enrichers,
            context: ContextPreserver::new(config.context()),
            assembler: MetadataAssembler::new(),
            agents: AgentIntegration::new(&config.agents)?,
        })
    }

    /// Replace the extractors used by both enhanced and realtime paths
    pub fn with_enrichers(mut self, enrichers: Enrichers, config: &PipelineConfig) -> Self {
        self.realtime = RealtimeProcessor::new(enrichers.clone(), config.realtime());
        self.enrichers = enrichers;
        self
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn Segmenter>) -> Self {
        self.chunkers = self.chunkers.with_segmenter(segmenter);
        self
    }

    pub fn with_notification_sink(mut self, sink: NotificationSink) -> Self {
        self.agents = self.agents.with_sink(sink);
        self
    }

    /// Chunk, enrich and annotate `content`
    ///
    /// Never fails: any stage error is logged and the call falls back to
    /// sentence-split `basic` chunks. Blank content yields no chunks.
    pub async fn process_content(
        &self,
        content: &str,
        content_type: &str,
        source_id: &str,
        priority: &str,
    ) -> Vec<ProcessedChunk> {
        if content.trim().is_empty() {
            return vec![];
        }

        match self.try_process(content, content_type, source_id, priority).await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Enhanced processing failed for {}: {}; using basic chunking", source_id, e);
                self.basic_fallback(content, content_type, source_id)
            }
        }
    }

    /// Like `process_content`, but surfaces stage errors instead of falling back
    pub async fn try_process(
        &self,
        content: &str,
        content_type: &str,
        source_id: &str,
        priority: &str,
    ) -> Result<Vec<ProcessedChunk>, PipelineError> {
        let mode = ProcessingMode::from_priority(priority);

        let mut chunks = self.chunkers.chunk(content, content_type);
        for (i, chunk) in chunks.iter_mut().enumerate() {
            chunk.source_id = source_id.to_string();
            chunk.content_type = content_type.to_string();
            chunk.chunk_index = i;
        }
        info!(
            "Chunked {} ({}) into {} chunks, mode {:?}",
            source_id,
            content_type,
            chunks.len(),
            mode
        );

        let chunks = match mode {
            ProcessingMode::Realtime => self.enrich_realtime(chunks).await?,
            _ => self.enrich_concurrently(chunks).await?,
        };

        let chunks = self.context.preserve(chunks);

        let mut processed: Vec<ProcessedChunk> = chunks
            .into_iter()
            .map(|chunk| self.assembler.assemble(chunk, mode))
            .collect();

        // Realtime calls share their deadline with notification delivery
        match mode {
            ProcessingMode::Realtime => {
                self.agents
                    .process_within(&mut processed, self.realtime.deadline())
                    .await
            }
            _ => self.agents.process(&mut processed).await,
        };

        Ok(processed)
    }

    /// Enrich every chunk on the blocking pool, keeping input order
    async fn enrich_concurrently(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>, PipelineError> {
        let mut set = JoinSet::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let enrichers = self.enrichers.clone();
            let text = chunk.text.clone();
            set.spawn_blocking(move || (i, enrichers.enrich(&text)));
        }

        let mut results: Vec<Option<Enrichment>> = vec![None; chunks.len()];
        while let Some(joined) = set.join_next().await {
            let (i, enrichment) = joined?;
            results[i] = Some(enrichment?);
        }

        attach(chunks, results)
    }

    async fn enrich_realtime(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>, PipelineError> {
        let mut set = JoinSet::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let processor = self.realtime.clone();
            let text = chunk.text.clone();
            set.spawn(async move { (i, processor.enrich(&text).await) });
        }

        let mut results: Vec<Option<Enrichment>> = vec![None; chunks.len()];
        while let Some(joined) = set.join_next().await {
            let (i, enrichment) = joined?;
            results[i] = Some(enrichment?);
        }

        attach(chunks, results)
    }

    /// Sentence-split `content` into minimal `basic` chunks
    pub fn basic_fallback(&self, content: &str, content_type: &str, source_id: &str) -> Vec<ProcessedChunk> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return vec![];
        }

        let mut sentences: Vec<&str> = trimmed
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if sentences.is_empty() {
            sentences.push(trimmed);
        }

        debug!("Basic fallback produced {} chunks for {}", sentences.len(), source_id);

        sentences
            .into_iter()
            .enumerate()
            .map(|(i, sentence)| self.assembler.basic(sentence, i, source_id, content_type))
            .collect()
    }
}

fn attach(mut chunks: Vec<Chunk>, results: Vec<Option<Enrichment>>) -> Result<Vec<Chunk>, PipelineError> {
    for (i, (chunk, enrichment)) in chunks.iter_mut().zip(results).enumerate() {
        chunk.enrichment = Some(enrichment.ok_or(PipelineError::MissingEnrichment(i))?);
    }
    Ok(chunks)
}
