use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::agents::AgentConfig;
use crate::chunkers::{BoundaryConfig, SpeakerChunkerConfig};
use crate::stages::{ContextConfig, RealtimeConfig};

/// Top-level pipeline configuration
///
/// Built from defaults, then an optional TOML file, then `SOPHIA_*`
/// environment variables, then CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Speaker turns shorter than this (chars) are dropped
    pub min_chunk_length: usize,
    /// Raw transcript lines kept around each turn
    pub context_lines: usize,
    pub internal_markers: Vec<String>,
    pub annotate_in_place: bool,
    /// Neighbouring chunks attached on each side
    pub context_window: usize,
    pub realtime_deadline_ms: u64,
    pub agents: AgentConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let speaker = SpeakerChunkerConfig::default();
        Self {
            min_chunk_length: speaker.min_chunk_length,
            context_lines: speaker.context_lines,
            internal_markers: speaker.internal_markers,
            annotate_in_place: false,
            context_window: ContextConfig::default().window,
            realtime_deadline_ms: 2000,
            agents: AgentConfig::default(),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => {
            let value = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Defaults, overlaid with `path` when given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `SOPHIA_*` overrides read through `lookup`
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = parse_var(&lookup, "SOPHIA_MIN_CHUNK_LENGTH")? {
            self.min_chunk_length = v;
        }
        if let Some(v) = parse_var(&lookup, "SOPHIA_CONTEXT_LINES")? {
            self.context_lines = v;
        }
        if let Some(v) = lookup("SOPHIA_INTERNAL_MARKERS") {
            self.internal_markers = v
                .split(',')
                .map(|m| m.trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect();
        }
        if let Some(v) = parse_var(&lookup, "SOPHIA_ANNOTATE_IN_PLACE")? {
            self.annotate_in_place = v;
        }
        if let Some(v) = parse_var(&lookup, "SOPHIA_CONTEXT_WINDOW")? {
            self.context_window = v;
        }
        if let Some(v) = parse_var(&lookup, "SOPHIA_REALTIME_DEADLINE_MS")? {
            self.realtime_deadline_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "SOPHIA_AGENTS_ENABLED")? {
            self.agents.enabled = v;
        }
        if let Some(v) = lookup("SOPHIA_WEBHOOK_URL") {
            let v = v.trim();
            self.agents.webhook_url = if v.is_empty() { None } else { Some(v.to_string()) };
        }
        Ok(())
    }

    pub fn boundary(&self) -> BoundaryConfig {
        BoundaryConfig {
            speaker: SpeakerChunkerConfig {
                min_chunk_length: self.min_chunk_length,
                context_lines: self.context_lines,
                internal_markers: self.internal_markers.clone(),
            },
            annotate_in_place: self.annotate_in_place,
        }
    }

    pub fn context(&self) -> ContextConfig {
        ContextConfig {
            window: self.context_window,
        }
    }

    pub fn realtime(&self) -> RealtimeConfig {
        RealtimeConfig {
            deadline: Duration::from_millis(self.realtime_deadline_ms),
        }
    }
}
