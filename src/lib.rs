pub mod agents;
pub mod chunkers;
pub mod config;
pub mod error;
pub mod extractors;
pub mod io;
pub mod models;
pub mod stages;

pub use agents::{AgentConfig, AgentIntegration, NotificationSink};
pub use chunkers::{BoundaryChunkers, BoundaryConfig, PassthroughSegmenter, Segmenter};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use extractors::{Enrichers, Scorer, SharedScorer};
pub use io::{
    BatchOutput, ContentRequest, HumanSummary, ProcessingReport, parse_batch_json,
    read_batch_file, read_text_file,
};
pub use models::{Chunk, ChunkType, EnhancedMetadata, ProcessedChunk, ProcessingMode};
pub use stages::SophiaChunkingPipeline;
