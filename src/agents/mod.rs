pub mod business_intel;
pub mod customer_health;
pub mod notify;
pub mod sales_coach;

pub use business_intel::*;
pub use customer_health::*;
pub use notify::*;
pub use sales_coach::*;

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::extractors::keywords::contains_term;
use crate::models::{AgentAction, AgentInsight, AgentKind, Notification, ProcessedChunk};

/// Configuration for the agent layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Master switch for the whole layer
    pub enabled: bool,
    pub sales_coach: bool,
    pub customer_health: bool,
    pub business_intelligence: bool,
    /// Deliver notifications here instead of the log
    pub webhook_url: Option<String>,
    pub webhook_timeout_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sales_coach: true,
            customer_health: true,
            business_intelligence: true,
            webhook_url: None,
            webhook_timeout_ms: 5000,
        }
    }
}

/// What one agent produced for one chunk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentOutput {
    pub insights: Vec<AgentInsight>,
    pub actions: Vec<AgentAction>,
    pub notifications: Vec<Notification>,
}

/// A keyword-triggered analyst over assembled chunks
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Lowercase terms that wake the agent up
    fn triggers(&self) -> &'static [&'static str];

    fn is_triggered(&self, chunk: &ProcessedChunk) -> bool {
        let lower = chunk.text.to_lowercase();
        self.triggers().iter().any(|t| contains_term(&lower, t))
    }

    fn analyze(&self, chunk: &ProcessedChunk) -> AgentOutput;
}

/// Runs the enabled agents over every chunk and delivers their notifications
pub struct AgentIntegration {
    agents: Vec<Box<dyn Agent>>,
    sink: NotificationSink,
    delivery_budget: Duration,
}

impl std::fmt::Debug for AgentIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<&str> = self.agents.iter().map(|a| a.kind().as_str()).collect();
        f.debug_struct("AgentIntegration")
            .field("agents", &kinds)
            .field("sink", &self.sink)
            .field("delivery_budget", &self.delivery_budget)
            .finish()
    }
}

impl AgentIntegration {
    pub fn new(config: &AgentConfig) -> Result<Self, PipelineError> {
        let mut agents: Vec<Box<dyn Agent>> = Vec::new();
        if config.enabled {
            if config.sales_coach {
                agents.push(Box::new(SalesCoachAgent));
            }
            if config.customer_health {
                agents.push(Box::new(CustomerHealthAgent));
            }
            if config.business_intelligence {
                agents.push(Box::new(BusinessIntelligenceAgent));
            }
        }

        let delivery_budget = Duration::from_millis(config.webhook_timeout_ms);
        let sink = match &config.webhook_url {
            Some(url) => NotificationSink::Webhook(WebhookSink::new(url.clone(), delivery_budget)?),
            None => NotificationSink::Log,
        };

        Ok(Self {
            agents,
            sink,
            delivery_budget,
        })
    }

    pub fn with_sink(mut self, sink: NotificationSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Attach insights and actions to each chunk's metadata
    ///
    /// Returns the number of notifications delivered within the configured
    /// webhook timeout. Failed deliveries are logged and skipped.
    pub async fn process(&self, chunks: &mut [ProcessedChunk]) -> usize {
        self.process_within(chunks, self.delivery_budget).await
    }

    /// Like `process`, with all deliveries sharing one `budget`
    ///
    /// Annotated copies of an utterance share its text, so a notification is
    /// sent once per agent, title and chunk text.
    pub async fn process_within(&self, chunks: &mut [ProcessedChunk], budget: Duration) -> usize {
        let mut seen: HashSet<(AgentKind, String, String)> = HashSet::new();
        let mut pending = Vec::new();

        for chunk in chunks.iter_mut() {
            for agent in &self.agents {
                if !agent.is_triggered(chunk) {
                    continue;
                }

                let output = agent.analyze(chunk);
                chunk.metadata.agent_insights.extend(output.insights);
                chunk.metadata.agent_actions.extend(output.actions);

                for notification in output.notifications {
                    let key = (notification.agent, notification.title.clone(), chunk.text.clone());
                    if seen.insert(key) {
                        pending.push(notification);
                    } else {
                        debug!(
                            "Skipping repeated {} notification for chunk {}",
                            agent.kind().as_str(),
                            chunk.metadata.chunk_id
                        );
                    }
                }
            }
        }

        let delivered = self.deliver_all(pending, budget).await;
        debug!("Agents delivered {} notifications", delivered);
        delivered
    }

    async fn deliver_all(&self, pending: Vec<Notification>, budget: Duration) -> usize {
        if pending.is_empty() {
            return 0;
        }

        let total = pending.len();
        let mut set = JoinSet::new();
        for notification in pending {
            let sink = self.sink.clone();
            set.spawn(async move {
                let result = sink.deliver(&notification).await;
                (notification, result)
            });
        }

        let mut delivered = 0;
        let drained = timeout(budget, async {
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok((_, Ok(()))) => delivered += 1,
                    Ok((notification, Err(e))) => warn!(
                        "{} notification for chunk {} not delivered: {}",
                        notification.agent.as_str(),
                        notification.chunk_id,
                        e
                    ),
                    Err(e) => warn!("Notification task failed: {}", e),
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                "Notification delivery exceeded {:?}; abandoning {} of {}",
                budget,
                set.len(),
                total
            );
            set.abort_all();
        }

        delivered
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use crate::extractors::Enrichers;
    use crate::models::{Chunk, ChunkType, Enrichment, ProcessedChunk, ProcessingMode};
    use crate::stages::MetadataAssembler;

    /// Read one HTTP request (headers plus content-length body)
    pub async fn read_request(socket: &mut TcpStream) -> String {
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            received.extend_from_slice(&buf[..n]);
            if n == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&received);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        l.to_lowercase()
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if received.len() >= header_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&received).to_string()
    }

    /// Webhook that answers 200 after `delay` and counts the requests it receives
    pub async fn counting_webhook(delay: Duration) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/hook", listener.local_addr().unwrap());
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let counter = Arc::clone(&counter);
                tokio::spawn(async move {
                    read_request(&mut socket).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(delay).await;
                    let _ = socket
                        .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                        .await;
                });
            }
        });

        (url, count)
    }

    /// Fully enriched chunk as the pipeline would hand it to the agents
    pub fn processed(text: &str) -> ProcessedChunk {
        let mut chunk = Chunk::new(text, ChunkType::Semantic);
        chunk.source_id = "test-source".to_string();
        chunk.content_type = "email".to_string();
        chunk.enrichment = Some(
            Enrichers::default()
                .enrich(text)
                .unwrap_or_else(|_| Enrichment::placeholder()),
        );
        MetadataAssembler::new().assemble(chunk, ProcessingMode::Enhanced)
    }
}
