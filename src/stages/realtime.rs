use std::sync::Arc;
use std::time::Duration;

use tokio::task::{self, JoinHandle};
use tokio::time::timeout;
use tracing::warn;

use crate::error::PipelineError;
use crate::extractors::{Enrichers, SharedScorer};
use crate::models::Enrichment;

/// Configuration for deadline-bound enrichment
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Budget for all four extractors on one chunk
    pub deadline: Duration,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_millis(2000),
        }
    }
}

/// Runs the four extractors for a chunk concurrently under a deadline
#[derive(Debug, Clone)]
pub struct RealtimeProcessor {
    enrichers: Enrichers,
    config: RealtimeConfig,
}

fn spawn_scorer<T: Send + 'static>(
    scorer: &SharedScorer<T>,
    text: &Arc<str>,
) -> JoinHandle<Result<T, PipelineError>> {
    let scorer = Arc::clone(scorer);
    let text = Arc::clone(text);
    task::spawn_blocking(move || scorer.score(&text))
}

impl RealtimeProcessor {
    pub fn new(enrichers: Enrichers, config: RealtimeConfig) -> Self {
        Self { enrichers, config }
    }

    pub fn deadline(&self) -> Duration {
        self.config.deadline
    }

    /// Enrich one chunk, or return a placeholder if the deadline passes
    ///
    /// Scorer errors and task panics are returned as errors.
    pub async fn enrich(&self, text: &str) -> Result<Enrichment, PipelineError> {
        let text: Arc<str> = Arc::from(text);

        let business = spawn_scorer(&self.enrichers.business, &text);
        let sentiment = spawn_scorer(&self.enrichers.sentiment, &text);
        let decision_makers = spawn_scorer(&self.enrichers.decision_makers, &text);
        let topics = spawn_scorer(&self.enrichers.topics, &text);

        let aborts = [
            business.abort_handle(),
            sentiment.abort_handle(),
            decision_makers.abort_handle(),
            topics.abort_handle(),
        ];

        let joined = async {
            let (business, sentiment, decision_makers, topics) =
                tokio::join!(business, sentiment, decision_makers, topics);
            Ok::<_, PipelineError>(Enrichment {
                business_intelligence: business??,
                sentiment: sentiment??,
                decision_makers: decision_makers??,
                topics: topics??,
            })
        };

        match timeout(self.config.deadline, joined).await {
            Ok(result) => result,
            Err(_) => {
                for handle in &aborts {
                    handle.abort();
                }
                warn!(
                    "Realtime enrichment exceeded {:?}, using placeholder",
                    self.config.deadline
                );
                Ok(Enrichment::placeholder())
            }
        }
    }
}
