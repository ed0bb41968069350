use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::PipelineError;
use crate::models::{
    ApartmentIndustryIntelligence, BusinessIntelligence, DecisionMakerIntelligence,
    FinancialIntelligence, FinancialUrgency, PerformanceIntelligence, TechnologyIntelligence,
};

use super::decision_makers::{authority_level, DecisionMakerExtractor};
use super::keywords::{contains_term, count_terms, matched_terms};
use super::money::extract_monetary_values;
use super::Scorer;

const FINANCIAL_KEYWORDS: &[&str] = &[
    "revenue", "budget", "cost", "price", "pricing", "roi", "investment", "contract", "deal",
    "discount", "payment", "invoice", "quote", "renewal", "upsell", "arr", "mrr",
];

const HIGH_URGENCY: &[&str] = &[
    "asap", "urgent", "immediately", "this week", "end of quarter", "deadline", "today",
];
const MEDIUM_URGENCY: &[&str] = &["next month", "soon", "this quarter", "next quarter", "this month"];

/// Revenue potential per financial keyword when no amount is quoted
const REVENUE_PER_KEYWORD: f64 = 5_000.0;

/// (category, weight, keywords)
const TECHNOLOGY_CATEGORIES: &[(&str, f64, &[&str])] = &[
    (
        "ai_ml",
        1.5,
        &["ai", "artificial intelligence", "machine learning", "automation", "chatbot", "predictive"],
    ),
    (
        "integration",
        1.2,
        &["api", "integration", "crm", "salesforce", "hubspot", "yardi", "realpage", "entrata"],
    ),
    ("data", 1.0, &["data", "analytics", "dashboard", "reporting", "insights"]),
    ("infrastructure", 0.8, &["cloud", "platform", "software", "saas", "security"]),
];

const PERFORMANCE_CATEGORIES: &[(&str, &[&str])] = &[
    ("efficiency", &["efficiency", "efficient", "faster", "streamline", "productivity", "time savings"]),
    ("cost_savings", &["save", "savings", "reduce costs", "cut costs", "cheaper", "lower cost"]),
    ("revenue_growth", &["growth", "increase revenue", "grow", "upsell", "expansion"]),
    ("customer_satisfaction", &["satisfaction", "nps", "retention", "happier", "reviews"]),
];

const APARTMENT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "property_management",
        &["property management", "property manager", "portfolio", "units", "multifamily", "apartment", "apartments"],
    ),
    ("leasing", &["lease", "leasing", "tenant", "tenants", "resident", "residents", "occupancy", "vacancy", "move-in"]),
    ("payments", &["rent", "rent collection", "late fee", "late fees", "delinquency", "ach", "autopay"]),
    ("maintenance", &["maintenance", "work order", "work orders", "repair", "repairs", "inspection"]),
    ("resident_experience", &["resident experience", "amenities", "portal", "resident satisfaction", "renewals"]),
];

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?\s?%").unwrap());

static ACTION_ITEM_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bneeds? to ([^.!?,;\n]+)",
        r"(?i)\baction items?:\s*([^.!?,;\n]+)",
        r"(?i)\b((?:send|call|meet|schedule) [^.!?,;\n]+)",
        r"(?i)\b((?:prepare|review) [^.!?,;\n]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const MAX_ACTION_ITEMS: usize = 10;

/// Keyword and regex scoring for financial, technology, performance and
/// apartment-industry relevance, plus decision makers and action items
#[derive(Debug, Clone, Default)]
pub struct BusinessIntelligenceExtractor {
    decision_makers: DecisionMakerExtractor,
}

impl BusinessIntelligenceExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&self, text: &str) -> BusinessIntelligence {
        let lower = text.to_lowercase();

        let makers = self.decision_makers.extract(text);

        BusinessIntelligence {
            financial: self.extract_financial_intelligence(text),
            technology: extract_technology(&lower),
            performance: extract_performance(text, &lower),
            apartment_industry: extract_apartment_industry(&lower),
            decision_makers: DecisionMakerIntelligence {
                has_decision_maker: !makers.is_empty(),
                authority_level: authority_level(&makers),
                decision_makers: makers,
            },
            action_items: extract_action_items(text),
        }
    }

    pub fn extract_financial_intelligence(&self, text: &str) -> FinancialIntelligence {
        let lower = text.to_lowercase();
        let monetary_values = extract_monetary_values(text);
        let financial_keywords: Vec<String> = matched_terms(&lower, FINANCIAL_KEYWORDS)
            .into_iter()
            .map(String::from)
            .collect();

        let total_value: f64 = monetary_values.iter().sum();
        let max_value = monetary_values.iter().copied().fold(0.0, f64::max);

        let revenue_potential = if max_value > 0.0 {
            max_value
        } else {
            financial_keywords.len() as f64 * REVENUE_PER_KEYWORD
        };

        let urgency = if HIGH_URGENCY.iter().any(|t| contains_term(&lower, t)) {
            FinancialUrgency::High
        } else if MEDIUM_URGENCY.iter().any(|t| contains_term(&lower, t)) {
            FinancialUrgency::Medium
        } else {
            FinancialUrgency::Low
        };

        FinancialIntelligence {
            has_financial_content: !monetary_values.is_empty() || !financial_keywords.is_empty(),
            monetary_values,
            total_value,
            max_value,
            revenue_potential,
            financial_keywords,
            urgency,
        }
    }
}

fn extract_technology(lower: &str) -> TechnologyIntelligence {
    let mut category_counts = BTreeMap::new();
    let mut mentioned_technologies = Vec::new();
    let mut weighted_total = 0.0f64;

    for &(category, weight, keywords) in TECHNOLOGY_CATEGORIES {
        let count = count_terms(lower, keywords);
        weighted_total += count as f64 * weight;
        category_counts.insert(category.to_string(), count);
        mentioned_technologies.extend(matched_terms(lower, keywords).into_iter().map(String::from));
    }

    TechnologyIntelligence {
        category_counts,
        mentioned_technologies,
        relevance_score: (weighted_total / 10.0).min(1.0),
    }
}

fn extract_performance(text: &str, lower: &str) -> PerformanceIntelligence {
    let mut category_counts = BTreeMap::new();
    let mut total = 0usize;

    for &(category, keywords) in PERFORMANCE_CATEGORIES {
        let count = count_terms(lower, keywords);
        total += count;
        category_counts.insert(category.to_string(), count);
    }

    let metrics = PERCENT_RE
        .find_iter(text)
        .map(|m| m.as_str().replace(' ', ""))
        .collect();

    PerformanceIntelligence {
        category_counts,
        metrics,
        impact_score: (total as f64 / 8.0).min(1.0),
    }
}

fn extract_apartment_industry(lower: &str) -> ApartmentIndustryIntelligence {
    let mut category_scores = BTreeMap::new();
    let mut total = 0usize;
    let mut primary: Option<(&str, usize)> = None;

    for &(category, keywords) in APARTMENT_CATEGORIES {
        let count = count_terms(lower, keywords);
        total += count;
        category_scores.insert(category.to_string(), (count as f64 / 3.0).min(1.0));
        if count > 0 && primary.is_none_or(|(_, best)| count > best) {
            primary = Some((category, count));
        }
    }

    ApartmentIndustryIntelligence {
        category_scores,
        primary_category: primary.map(|(category, _)| category.to_string()),
        overall_relevance: (total as f64 / 10.0).min(1.0),
    }
}

fn extract_action_items(text: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();

    for re in ACTION_ITEM_RES.iter() {
        for caps in re.captures_iter(text) {
            let Some(m) = caps.get(1) else {
                continue;
            };
            let item = m.as_str().trim().trim_end_matches(',').to_string();
            if item.is_empty() || items.iter().any(|i| i.eq_ignore_ascii_case(&item)) {
                continue;
            }
            items.push(item);
            if items.len() >= MAX_ACTION_ITEMS {
                return items;
            }
        }
    }

    items
}

impl Scorer for BusinessIntelligenceExtractor {
    type Output = BusinessIntelligence;

    fn name(&self) -> &'static str {
        "business_intelligence"
    }

    fn score(&self, text: &str) -> Result<BusinessIntelligence, PipelineError> {
        Ok(self.extract(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_intelligence_with_amounts() {
        let extractor = BusinessIntelligenceExtractor::new();
        let result = extractor.extract_financial_intelligence(
            "The renewal is $48,000 and we could upsell another 12k if we sign this week.",
        );

        assert_eq!(result.monetary_values, vec![48_000.0, 12_000.0]);
        assert_eq!(result.total_value, 60_000.0);
        assert_eq!(result.revenue_potential, 48_000.0);
        assert_eq!(result.urgency, FinancialUrgency::High);
        assert_eq!(result.financial_keywords, vec!["renewal", "upsell"]);
        assert!(result.has_financial_content);
    }

    #[test]
    fn test_financial_intelligence_keywords_only() {
        let extractor = BusinessIntelligenceExtractor::new();
        let result =
            extractor.extract_financial_intelligence("Let's revisit pricing and the budget next quarter.");

        assert!(result.monetary_values.is_empty());
        assert_eq!(result.revenue_potential, 10_000.0);
        assert_eq!(result.urgency, FinancialUrgency::Medium);
    }

    #[test]
    fn test_financial_intelligence_is_idempotent() {
        let extractor = BusinessIntelligenceExtractor::new();
        let text = "Budget is 2 million for the portfolio, decision today.";
        assert_eq!(
            extractor.extract_financial_intelligence(text),
            extractor.extract_financial_intelligence(text)
        );
    }

    #[test]
    fn test_technology_relevance() {
        let lower = "our ai chatbot syncs with yardi through the api and feeds the analytics dashboard";
        let tech = extract_technology(lower);

        assert_eq!(tech.category_counts["ai_ml"], 2);
        assert_eq!(tech.category_counts["integration"], 2);
        assert_eq!(tech.category_counts["data"], 2);
        // 2*1.5 + 2*1.2 + 2*1.0 = 7.4
        assert!((tech.relevance_score - 0.74).abs() < 1e-9);
    }

    #[test]
    fn test_scores_are_capped() {
        let extractor = BusinessIntelligenceExtractor::new();
        let text = "ai ai ai ai ai ai ai ai api api api api. \
                    growth growth growth savings savings savings retention retention retention. \
                    rent rent rent lease lease lease maintenance maintenance units units units residents";
        let result = extractor.extract(text);

        assert_eq!(result.technology.relevance_score, 1.0);
        assert_eq!(result.performance.impact_score, 1.0);
        assert_eq!(result.apartment_industry.overall_relevance, 1.0);
        for score in result.apartment_industry.category_scores.values() {
            assert!((0.0..=1.0).contains(score));
        }
    }

    #[test]
    fn test_apartment_industry_primary_category() {
        let result = extract_apartment_industry(
            "delinquency is up, rent collection is slow and late fees are piling up across 400 units",
        );

        assert_eq!(result.primary_category.as_deref(), Some("payments"));
        assert_eq!(result.category_scores["payments"], 1.0);
        assert!((result.category_scores["property_management"] - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_performance_metrics() {
        let text = "We saw a 15% lift in retention and 3.5 % fewer work orders.";
        let result = extract_performance(text, &text.to_lowercase());

        assert_eq!(result.metrics, vec!["15%", "3.5%"]);
        assert_eq!(result.category_counts["customer_satisfaction"], 1);
    }

    #[test]
    fn test_action_items() {
        let items = extract_action_items(
            "We need to finalize the pilot scope. Action item: loop in legal. \
             I'll send the proposal Monday, then review the contract terms.",
        );

        assert_eq!(
            items,
            vec![
                "finalize the pilot scope",
                "loop in legal",
                "send the proposal Monday",
                "review the contract terms",
            ]
        );
    }

    #[test]
    fn test_decision_maker_section() {
        let extractor = BusinessIntelligenceExtractor::new();
        let result = extractor.extract("Sarah Chen, our CFO, signs off on anything over 50k.");

        assert!(result.decision_makers.has_decision_maker);
        assert_eq!(
            result.decision_makers.authority_level,
            crate::models::AuthorityLevel::Executive
        );
    }
}
