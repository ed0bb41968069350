use crate::extractors::keywords::matched_terms;
use crate::models::{
    ActionPriority, AgentAction, AgentInsight, AgentKind, DecisionType, Notification,
    NotificationSeverity, ProcessedChunk, SentimentLabel,
};

use super::{Agent, AgentOutput};

const TRIGGERS: &[&str] = &[
    "price", "pricing", "cost", "discount", "budget", "contract", "proposal", "demo",
    "competitor", "objection", "deal", "quote",
];

const OBJECTION_TERMS: &[&str] = &[
    "too expensive",
    "competitor",
    "not sure",
    "concerned",
    "cheaper",
    "not in the budget",
    "no budget",
    "need to think",
];

const PRICING_TERMS: &[&str] = &["price", "pricing", "quote", "discount", "cost"];

/// Decisions at or above this value page the sales channel
const HIGH_VALUE_DECISION: f64 = 50_000.0;

/// Coaching tips for reps during sales conversations
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesCoachAgent;

impl Agent for SalesCoachAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::SalesCoach
    }

    fn triggers(&self) -> &'static [&'static str] {
        TRIGGERS
    }

    fn analyze(&self, chunk: &ProcessedChunk) -> AgentOutput {
        let meta = &chunk.metadata;
        let lower = chunk.text.to_lowercase();
        let mut out = AgentOutput::default();

        let insight = |insight_type: &str, message: String, confidence: f64| AgentInsight {
            agent: AgentKind::SalesCoach,
            insight_type: insight_type.to_string(),
            message,
            confidence,
        };
        let action = |action_type: &str, description: String, priority| AgentAction {
            agent: AgentKind::SalesCoach,
            action_type: action_type.to_string(),
            description,
            priority,
        };

        let objections = matched_terms(&lower, OBJECTION_TERMS);

        if let (Some(context), Some(confidence)) = (&meta.decision_context, meta.decision_confidence) {
            let value = meta.estimated_value.unwrap_or(0.0);
            out.insights.push(insight(
                "buying_signal",
                format!("Buying signal around {} (est. ${:.0})", context, value),
                confidence,
            ));

            let who = meta.speaker.as_deref().unwrap_or("the prospect");
            let priority = if value >= HIGH_VALUE_DECISION {
                ActionPriority::High
            } else {
                ActionPriority::Medium
            };
            out.actions.push(action(
                "follow_up",
                format!("Send {} follow-up to {} within 24 hours", context, who),
                priority,
            ));

            if meta.decision_type == Some(DecisionType::Explicit) && value >= HIGH_VALUE_DECISION {
                out.notifications.push(Notification {
                    agent: AgentKind::SalesCoach,
                    channel: "#sales".to_string(),
                    severity: NotificationSeverity::Info,
                    title: "High-value decision point".to_string(),
                    body: format!("{} decision worth ${:.0}: \"{}\"", context, value, chunk.text),
                    source_id: chunk.source_id.clone(),
                    chunk_id: meta.chunk_id.clone(),
                });
            }
        } else if !objections.is_empty() || meta.sentiment_label == SentimentLabel::Negative {
            out.insights.push(insight(
                "objection_handling",
                format!(
                    "Objection raised around {}; acknowledge it and reframe on value",
                    meta.primary_topic
                ),
                0.75,
            ));
            let concern = if objections.is_empty() {
                format!("negative sentiment around {}", meta.primary_topic)
            } else {
                objections.join(", ")
            };
            out.actions.push(action(
                "address_objection",
                format!("Prepare a response to: {}", concern),
                ActionPriority::Medium,
            ));
        } else {
            out.insights.push(insight(
                "coaching_tip",
                format!(
                    "Prospect is discussing {}; ask a discovery question before pitching",
                    meta.primary_topic
                ),
                0.5,
            ));
        }

        if meta.decision_context.is_none() && !matched_terms(&lower, PRICING_TERMS).is_empty() {
            out.actions.push(action(
                "prepare_pricing",
                "Prepare a tailored pricing summary".to_string(),
                ActionPriority::Medium,
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::processed;

    #[test]
    fn test_buying_signal_from_decision() {
        let mut chunk = processed("Let's proceed with the contract at $80k.");
        chunk.metadata.decision_type = Some(DecisionType::Explicit);
        chunk.metadata.decision_context = Some("contract".to_string());
        chunk.metadata.decision_confidence = Some(0.9);
        chunk.metadata.estimated_value = Some(80_000.0);

        let out = SalesCoachAgent.analyze(&chunk);

        assert_eq!(out.insights[0].insight_type, "buying_signal");
        assert_eq!(out.insights[0].confidence, 0.9);
        assert_eq!(out.actions[0].priority, ActionPriority::High);
        assert_eq!(out.notifications.len(), 1);
        assert_eq!(out.notifications[0].channel, "#sales");
    }

    #[test]
    fn test_objection_handling() {
        let chunk = processed("Honestly your pricing is too expensive compared to a competitor.");
        assert!(SalesCoachAgent.is_triggered(&chunk));

        let out = SalesCoachAgent.analyze(&chunk);

        assert_eq!(out.insights[0].insight_type, "objection_handling");
        assert!(out.actions.iter().any(|a| a.action_type == "address_objection"));
        assert!(out.actions.iter().any(|a| a.action_type == "prepare_pricing"));
        assert!(out.notifications.is_empty());
    }

    #[test]
    fn test_not_triggered_without_sales_terms() {
        let chunk = processed("The maintenance team fixed the leak.");
        assert!(!SalesCoachAgent.is_triggered(&chunk));
    }

    #[test]
    fn test_negative_sentiment_objection_names_topic() {
        let mut chunk = processed("The onboarding was slow and the reports keep failing.");
        chunk.metadata.sentiment_label = SentimentLabel::Negative;
        chunk.metadata.primary_topic = "operational".to_string();

        let out = SalesCoachAgent.analyze(&chunk);

        let objection = out
            .actions
            .iter()
            .find(|a| a.action_type == "address_objection")
            .unwrap();
        assert_eq!(
            objection.description,
            "Prepare a response to: negative sentiment around operational"
        );
    }
}
