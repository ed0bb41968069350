use crate::extractors::keywords::matched_terms;
use crate::models::{
    ActionPriority, AgentAction, AgentInsight, AgentKind, EmotionCategory, Notification,
    NotificationSeverity, ProcessedChunk, SentimentLabel,
};

use super::{Agent, AgentOutput};

const TRIGGERS: &[&str] = &[
    "cancel", "cancelling", "canceling", "churn", "terminate", "renewal", "renew", "frustrated",
    "frustrating", "unhappy", "complaint", "problem", "issue", "support", "happy", "satisfied",
];

const CHURN_TERMS: &[&str] = &[
    "cancel",
    "cancelling",
    "canceling",
    "churn",
    "terminate",
    "switch providers",
    "not renewing",
];

const DISTRESS_TERMS: &[&str] = &[
    "frustrated",
    "frustrating",
    "unhappy",
    "complaint",
    "problem",
    "issue",
    "broken",
];

/// Tracks account health signals for customer success
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerHealthAgent;

impl CustomerHealthAgent {
    fn notification(
        chunk: &ProcessedChunk,
        severity: NotificationSeverity,
        title: &str,
        body: String,
    ) -> Notification {
        Notification {
            agent: AgentKind::CustomerHealth,
            channel: "#customer-success".to_string(),
            severity,
            title: title.to_string(),
            body,
            source_id: chunk.source_id.clone(),
            chunk_id: chunk.metadata.chunk_id.clone(),
        }
    }
}

impl Agent for CustomerHealthAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::CustomerHealth
    }

    fn triggers(&self) -> &'static [&'static str] {
        TRIGGERS
    }

    fn analyze(&self, chunk: &ProcessedChunk) -> AgentOutput {
        let meta = &chunk.metadata;
        let lower = chunk.text.to_lowercase();
        let mut out = AgentOutput::default();

        let churn = matched_terms(&lower, CHURN_TERMS);
        let distress = matched_terms(&lower, DISTRESS_TERMS);
        let frustrated = meta.emotional_category == Some(EmotionCategory::Frustration);

        let (insight_type, message, confidence) = if !churn.is_empty() {
            out.actions.push(AgentAction {
                agent: AgentKind::CustomerHealth,
                action_type: "escalate_account".to_string(),
                description: "Escalate to the account owner for a retention call".to_string(),
                priority: ActionPriority::High,
            });
            out.notifications.push(Self::notification(
                chunk,
                NotificationSeverity::Critical,
                "Churn risk",
                format!("Churn language ({}): \"{}\"", churn.join(", "), chunk.text),
            ));
            ("churn_risk", format!("Customer used churn language: {}", churn.join(", ")), 0.8)
        } else if !distress.is_empty() || frustrated || meta.sentiment_label == SentimentLabel::Negative {
            out.actions.push(AgentAction {
                agent: AgentKind::CustomerHealth,
                action_type: "schedule_check_in".to_string(),
                description: "Schedule a check-in to resolve open issues".to_string(),
                priority: ActionPriority::Medium,
            });
            out.notifications.push(Self::notification(
                chunk,
                NotificationSeverity::Warning,
                "Account health declining",
                format!("Negative signals in {}: \"{}\"", chunk.source_id, chunk.text),
            ));
            (
                "health_decline",
                "Customer sentiment is trending negative".to_string(),
                meta.sentiment_confidence.max(0.5),
            )
        } else if meta.sentiment_label == SentimentLabel::Positive {
            out.actions.push(AgentAction {
                agent: AgentKind::CustomerHealth,
                action_type: "request_referral".to_string(),
                description: "Ask for a referral or case study".to_string(),
                priority: ActionPriority::Low,
            });
            (
                "healthy_account",
                "Customer is expressing satisfaction".to_string(),
                meta.sentiment_confidence,
            )
        } else {
            ("account_check_in", "No strong health signal".to_string(), 0.4)
        };

        out.insights.push(AgentInsight {
            agent: AgentKind::CustomerHealth,
            insight_type: insight_type.to_string(),
            message,
            confidence,
        });

        out
    }
}
