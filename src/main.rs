use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sophia_chunker::{
    BatchOutput, ChunkType, ContentRequest, HumanSummary, PipelineConfig, ProcessingReport,
    SophiaChunkingPipeline, read_batch_file, read_text_file,
};

#[derive(Parser)]
#[command(name = "sophia-chunker")]
#[command(author, version, about = "Conversation chunking and business-intelligence enrichment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk and enrich content
    Process {
        /// Input file (plain text, or a JSON batch with --batch)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for chunks (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Treat the input as a JSON batch of {content, content_type, source_id, priority}
        #[arg(long)]
        batch: bool,

        /// Output file for a human-readable summary (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Content type for plain-text input ("gong_call" enables speaker chunking)
        #[arg(long, default_value = "document")]
        content_type: String,

        /// Source id for plain-text input (defaults to the file stem)
        #[arg(long)]
        source_id: Option<String>,

        /// Priority for plain-text input ("high" enables realtime mode)
        #[arg(long, default_value = "normal")]
        priority: String,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Annotate decisions and emotions in place instead of duplicating chunks
        #[arg(long)]
        in_place: bool,

        /// Disable the agent layer
        #[arg(long)]
        no_agents: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print chunk, speaker, topic and sentiment statistics
    Analyze {
        /// Input file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Content type ("gong_call" enables speaker chunking)
        #[arg(long, default_value = "gong_call")]
        content_type: String,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            batch,
            human_readable,
            content_type,
            source_id,
            priority,
            config,
            in_place,
            no_agents,
            verbose,
        } => {
            setup_logging(verbose);

            let mut pipeline_config = PipelineConfig::load(config.as_deref())?;
            if in_place {
                pipeline_config.annotate_in_place = true;
            }
            if no_agents {
                pipeline_config.agents.enabled = false;
            }

            let requests = if batch {
                read_batch_file(&input).context("Failed to load batch input")?
            } else {
                vec![read_text_file(&input, &content_type, source_id.as_deref(), &priority)?]
            };

            process_requests(&pipeline_config, requests, &output, human_readable.as_deref()).await
        }
        Commands::Analyze {
            input,
            content_type,
            config,
            verbose,
        } => {
            setup_logging(verbose);
            let mut pipeline_config = PipelineConfig::load(config.as_deref())?;
            pipeline_config.agents.enabled = false;
            analyze_content(&pipeline_config, &input, &content_type).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn process_requests(
    config: &PipelineConfig,
    requests: Vec<ContentRequest>,
    output: &Path,
    human_readable: Option<&Path>,
) -> Result<()> {
    let pipeline = SophiaChunkingPipeline::new(config)?;
    info!("Processing {} requests", requests.len());

    let mut reports = Vec::with_capacity(requests.len());
    for request in requests {
        let chunks = pipeline
            .process_content(
                &request.content,
                &request.content_type,
                &request.source_id,
                &request.priority,
            )
            .await;
        info!("{}: {} chunks", request.source_id, chunks.len());

        reports.push(ProcessingReport {
            source_id: request.source_id,
            content_type: request.content_type,
            chunks,
        });
    }

    if let Some(path) = human_readable {
        HumanSummary::new(&reports).write_file(path)?;
        info!("Human-readable output written to {:?}", path);
    }

    let batch = BatchOutput::new(reports);
    batch.write_json(output)?;
    info!("Output written to {:?}", output);

    info!(
        "Complete: {} chunks, {} insights, {} actions",
        batch.summary.total_chunks, batch.summary.total_insights, batch.summary.total_actions
    );

    Ok(())
}

async fn analyze_content(config: &PipelineConfig, input: &Path, content_type: &str) -> Result<()> {
    info!("Analyzing content from {:?}", input);
    let request = read_text_file(input, content_type, None, "normal")?;

    let pipeline = SophiaChunkingPipeline::new(config)?;
    let chunks = pipeline
        .process_content(
            &request.content,
            &request.content_type,
            &request.source_id,
            &request.priority,
        )
        .await;

    println!("Content Analysis");
    println!("================");
    println!("Source: {}", request.source_id);
    println!("Characters: {}", request.content.chars().count());
    println!("Total chunks: {}", chunks.len());
    println!();

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_topic: BTreeMap<String, usize> = BTreeMap::new();
    for chunk in &chunks {
        *by_type.entry(chunk.chunk_type.to_string()).or_insert(0) += 1;
        *by_topic.entry(chunk.metadata.primary_topic.clone()).or_insert(0) += 1;
    }

    println!("Chunk Types");
    println!("-----------");
    for (chunk_type, count) in &by_type {
        println!("{}: {}", chunk_type, count);
    }
    println!();

    println!("Topics");
    println!("------");
    for (topic, count) in &by_topic {
        println!("{}: {}", topic, count);
    }
    println!();

    // Original turns only; annotated copies are skipped
    let mut speakers: BTreeMap<String, (usize, f64, usize)> = BTreeMap::new();
    for chunk in chunks
        .iter()
        .filter(|c| c.chunk_type == ChunkType::SpeakerBoundary)
    {
        let name = chunk.metadata.speaker.clone().unwrap_or_else(|| "unknown".to_string());
        let entry = speakers.entry(name).or_insert((0, 0.0, 0));
        entry.0 += 1;
        entry.1 += chunk.metadata.sentiment_score;
        entry.2 += chunk.text.split_whitespace().count();
    }

    println!("Speaker Statistics");
    println!("------------------");
    if speakers.is_empty() {
        println!("No speaker turns detected");
    }
    for (speaker, (turns, sentiment_total, words)) in &speakers {
        println!(
            "{}: {} turns, {} words, avg sentiment {:+.2}",
            speaker,
            turns,
            words,
            sentiment_total / (*turns).max(1) as f64
        );
    }
    println!();

    let decisions = chunks
        .iter()
        .filter(|c| c.metadata.decision_context.is_some())
        .count();
    let emotional = chunks
        .iter()
        .filter(|c| c.metadata.emotional_category.is_some())
        .count();
    let overall = if chunks.is_empty() {
        0.0
    } else {
        chunks.iter().map(|c| c.metadata.sentiment_score).sum::<f64>() / chunks.len() as f64
    };

    println!("Signals");
    println!("-------");
    println!("Decision points: {}", decisions);
    println!("Emotional moments: {}", emotional);
    println!("Average sentiment: {:+.2}", overall);

    Ok(())
}
