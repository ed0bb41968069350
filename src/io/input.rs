use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_content_type() -> String {
    "document".to_string()
}

fn default_priority() -> String {
    "normal".to_string()
}

/// One unit of work for `process_content`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub content: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub source_id: String,
    #[serde(default = "default_priority")]
    pub priority: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchShape {
    Many(Vec<ContentRequest>),
    One(ContentRequest),
}

/// Parse a JSON batch: an array of requests or a single request object
///
/// Requests without a `source_id` get `"<index>"` so output stays traceable.
pub fn parse_batch_json(json: &str) -> Result<Vec<ContentRequest>> {
    let shape: BatchShape = serde_json::from_str(json).context("Failed to parse batch JSON")?;
    let mut requests = match shape {
        BatchShape::Many(requests) => requests,
        BatchShape::One(request) => vec![request],
    };

    for (i, request) in requests.iter_mut().enumerate() {
        if request.source_id.trim().is_empty() {
            request.source_id = format!("request-{}", i);
        }
    }

    Ok(requests)
}

pub fn read_batch_file(path: &Path) -> Result<Vec<ContentRequest>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_batch_json(&content).with_context(|| format!("Invalid batch file: {:?}", path))
}

/// Read a plain-text file as a single request
///
/// The source id defaults to the file stem.
pub fn read_text_file(
    path: &Path,
    content_type: &str,
    source_id: Option<&str>,
    priority: &str,
) -> Result<ContentRequest> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;

    let source_id = match source_id {
        Some(id) => id.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "input".to_string()),
    };

    Ok(ContentRequest {
        content,
        content_type: content_type.to_string(),
        source_id,
        priority: priority.to_string(),
    })
}
