use serde::{Deserialize, Serialize};

/// Keyword-triggered agents run over assembled chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    SalesCoach,
    CustomerHealth,
    BusinessIntelligence,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::SalesCoach => "sales_coach",
            AgentKind::CustomerHealth => "customer_health",
            AgentKind::BusinessIntelligence => "business_intelligence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInsight {
    pub agent: AgentKind,
    pub insight_type: String,
    pub message: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    pub agent: AgentKind,
    pub action_type: String,
    pub description: String,
    pub priority: ActionPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    Info,
    Warning,
    Critical,
}

/// Alert produced by an agent for delivery to a team channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub agent: AgentKind,
    pub channel: String,
    pub severity: NotificationSeverity,
    pub title: String,
    pub body: String,
    pub source_id: String,
    pub chunk_id: String,
}
