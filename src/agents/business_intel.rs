use crate::extractors::keywords::contains_term;
use crate::models::{
    ActionPriority, AgentAction, AgentInsight, AgentKind, Notification, NotificationSeverity,
    ProcessedChunk,
};

use super::{Agent, AgentOutput};

const TRIGGERS: &[&str] = &[
    "revenue", "roi", "growth", "expansion", "portfolio", "units", "properties", "market",
    "competitor", "budget", "investment",
];

/// Revenue potential at which the revenue channel is notified
const NOTIFY_REVENUE_THRESHOLD: f64 = 100_000.0;

/// Action items forwarded per chunk
const MAX_FORWARDED_ACTION_ITEMS: usize = 3;

/// Surfaces revenue, stakeholder and market signals for leadership
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessIntelligenceAgent;

impl BusinessIntelligenceAgent {
    fn insight(insight_type: &str, message: String, confidence: f64) -> AgentInsight {
        AgentInsight {
            agent: AgentKind::BusinessIntelligence,
            insight_type: insight_type.to_string(),
            message,
            confidence,
        }
    }
}

impl Agent for BusinessIntelligenceAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::BusinessIntelligence
    }

    fn triggers(&self) -> &'static [&'static str] {
        TRIGGERS
    }

    /// Also wakes on money or decision makers found by the extractors
    fn is_triggered(&self, chunk: &ProcessedChunk) -> bool {
        let lower = chunk.text.to_lowercase();
        if TRIGGERS.iter().any(|t| contains_term(&lower, t)) {
            return true;
        }
        chunk.metadata.business_intelligence.as_ref().is_some_and(|bi| {
            bi.financial.has_financial_content || bi.decision_makers.has_decision_maker
        })
    }

    fn analyze(&self, chunk: &ProcessedChunk) -> AgentOutput {
        let meta = &chunk.metadata;
        let mut out = AgentOutput::default();

        if let Some(bi) = &meta.business_intelligence {
            let revenue = bi.financial.revenue_potential;
            if revenue > 0.0 {
                out.insights.push(Self::insight(
                    "revenue_opportunity",
                    format!("Estimated revenue potential ${:.0}", revenue),
                    0.6,
                ));
                if revenue >= NOTIFY_REVENUE_THRESHOLD {
                    out.notifications.push(Notification {
                        agent: AgentKind::BusinessIntelligence,
                        channel: "#revenue-intel".to_string(),
                        severity: NotificationSeverity::Info,
                        title: "Large revenue opportunity".to_string(),
                        body: format!("${:.0} mentioned in {}", revenue, chunk.source_id),
                        source_id: chunk.source_id.clone(),
                        chunk_id: meta.chunk_id.clone(),
                    });
                }
            }

            if !meta.decision_makers.is_empty() {
                out.insights.push(Self::insight(
                    "decision_makers_identified",
                    format!("Stakeholders: {}", meta.decision_makers.join(", ")),
                    0.7,
                ));
                out.actions.push(AgentAction {
                    agent: AgentKind::BusinessIntelligence,
                    action_type: "update_crm".to_string(),
                    description: format!("Add {} to the account contacts", meta.decision_makers.join(", ")),
                    priority: ActionPriority::Medium,
                });
            }

            if let Some(category) = &bi.apartment_industry.primary_category {
                out.insights.push(Self::insight(
                    "industry_focus",
                    format!("Conversation centres on {}", category.replace('_', " ")),
                    bi.apartment_industry.overall_relevance,
                ));
            }

            if !bi.technology.mentioned_technologies.is_empty() {
                out.insights.push(Self::insight(
                    "technology_stack",
                    format!("Technologies mentioned: {}", bi.technology.mentioned_technologies.join(", ")),
                    bi.technology.relevance_score,
                ));
            }

            for item in bi.action_items.iter().take(MAX_FORWARDED_ACTION_ITEMS) {
                out.actions.push(AgentAction {
                    agent: AgentKind::BusinessIntelligence,
                    action_type: "action_item".to_string(),
                    description: item.clone(),
                    priority: ActionPriority::Medium,
                });
            }
        }

        if out.insights.is_empty() {
            out.insights.push(Self::insight(
                "market_signal",
                format!("Business context: {}", meta.primary_topic),
                meta.topic_confidence,
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
    fn test_large_opportunity_notifies() {
        let chunk = processed("Sarah Chen, our CFO, said the portfolio deal is worth $250k.");
        assert!(BusinessIntelligenceAgent.is_triggered(&chunk));

        let out = BusinessIntelligenceAgent.analyze(&chunk);
        let types: Vec<_> = out.insights.iter().map(|i| i.insight_type.as_str()).collect();

        assert!(types.contains(&"revenue_opportunity"));
        assert!(types.contains(&"decision_makers_identified"));
        assert!(types.contains(&"industry_focus"));
        assert_eq!(out.notifications.len(), 1);
        assert_eq!(out.notifications[0].channel, "#revenue-intel");
        assert!(out.actions.iter().any(|a| a.action_type == "update_crm"));
    }

    #[test]
    fn test_triggered_by_money_alone() {
        let chunk = processed("That comes to 40k a year.");
        assert!(BusinessIntelligenceAgent.is_triggered(&chunk));

        let out = BusinessIntelligenceAgent.analyze(&chunk);
        assert!(out.notifications.is_empty());
        assert_eq!(out.insights[0].insight_type, "revenue_opportunity");
    }

    #[test]
    fn test_quiet_chunk_not_triggered() {
        let chunk = processed("See you on Thursday.");
        assert!(!BusinessIntelligenceAgent.is_triggered(&chunk));
    }

    #[test]
    fn test_action_items_forwarded() {
        let chunk = processed("We need to review the market data and schedule a budget call.");
        let out = BusinessIntelligenceAgent.analyze(&chunk);

        assert!(out.actions.iter().any(|a| a.action_type == "action_item"));
    }
}
