use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::ProcessedChunk;

/// Pipeline output for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub source_id: String,
    pub content_type: String,
    pub chunks: Vec<ProcessedChunk>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSummary {
    pub total_requests: usize,
    pub total_chunks: usize,
    pub chunks_by_type: BTreeMap<String, usize>,
    pub chunks_by_topic: BTreeMap<String, usize>,
    pub total_insights: usize,
    pub total_actions: usize,
}

impl OutputSummary {
    pub fn from_reports(reports: &[ProcessingReport]) -> Self {
        let mut chunks_by_type = BTreeMap::new();
        let mut chunks_by_topic = BTreeMap::new();
        let mut total_insights = 0;
        let mut total_actions = 0;

        for chunk in reports.iter().flat_map(|r| &r.chunks) {
            *chunks_by_type.entry(chunk.chunk_type.to_string()).or_insert(0) += 1;
            *chunks_by_topic
                .entry(chunk.metadata.primary_topic.clone())
                .or_insert(0) += 1;
            total_insights += chunk.metadata.agent_insights.len();
            total_actions += chunk.metadata.agent_actions.len();
        }

        Self {
            total_requests: reports.len(),
            total_chunks: reports.iter().map(|r| r.chunks.len()).sum(),
            chunks_by_type,
            chunks_by_topic,
            total_insights,
            total_actions,
        }
    }
}

/// Machine-readable output file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    pub generated_at: String,
    pub summary: OutputSummary,
    pub results: Vec<ProcessingReport>,
}

impl BatchOutput {
    pub fn new(results: Vec<ProcessingReport>) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            summary: OutputSummary::from_reports(&results),
            results,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable chunk listing
pub struct HumanSummary<'a> {
    reports: &'a [ProcessingReport],
}

impl<'a> HumanSummary<'a> {
    pub fn new(reports: &'a [ProcessingReport]) -> Self {
        Self { reports }
    }

    pub fn format(&self) -> String {
        let mut output = String::new();

        for report in self.reports {
            output.push_str(&format!(
                "== {} ({}) - {} chunks ==\n\n",
                report.source_id,
                report.content_type,
                report.chunks.len()
            ));

            for chunk in &report.chunks {
                let meta = &chunk.metadata;
                output.push_str(&format!(
                    "[{}] {} | {} | topic: {} | sentiment: {:+.2}\n",
                    meta.chunk_index,
                    chunk.chunk_type,
                    meta.speaker.as_deref().unwrap_or("-"),
                    meta.primary_topic,
                    meta.sentiment_score
                ));
                if let (Some(context), Some(value)) = (&meta.decision_context, meta.estimated_value) {
                    output.push_str(&format!("Decision: {} (est. {})\n", context, format_money(value)));
                }

                output.push_str(&wrap_indented(&chunk.text, SUMMARY_WIDTH, "  "));
                output.push('\n');

                for insight in &meta.agent_insights {
                    output.push_str(&format!("  * {}: {}\n", insight.agent.as_str(), insight.message));
                }
                for action in &meta.agent_actions {
                    output.push_str(&format!(
                        "  -> {} ({:?}): {}\n",
                        action.action_type, action.priority, action.description
                    ));
                }
                output.push('\n');
            }
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Format a dollar amount with thousands separators, e.g. "$50,000"
fn format_money(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Line width of chunk text in the human summary
const SUMMARY_WIDTH: usize = 80;

/// Word-wrap `text` into lines of at most `width` characters, each prefixed
/// with `indent`. A single word longer than the line stays on its own line.
fn wrap_indented(text: &str, width: usize, indent: &str) -> String {
    let room = width.saturating_sub(indent.chars().count()).max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > room {
            lines.push(format!("{}{}", indent, current));
            current.clear();
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if current_len > 0 {
        lines.push(format!("{}{}", indent, current));
    }

    lines.join("\n")
}
