use std::sync::LazyLock;

use regex::Regex;

use crate::error::PipelineError;
use crate::models::{AuthorityLevel, DecisionMaker};

use super::Scorer;

const TITLE: &str = r"(?:CEO|CFO|CTO|COO|CIO|CRO|Chief [A-Z][a-z]+ Officer|(?:Senior |Executive )?Vice President(?: of [A-Z][a-z]+)?|(?:Senior )?VP(?: of [A-Z][a-z]+)?|President|Co-Founder|Founder|Owner|Principal|(?:Regional |Property |General )?Manager|Director(?: of [A-Z][a-z]+)?|Head of [A-Z][a-z]+)";
const NAME: &str = r"[A-Z][a-z]+(?: [A-Z][a-z]+){1,2}";

static NAME_THEN_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<name>{NAME}),?\s+(?:is\s+)?(?:the\s+|our\s+|their\s+)?(?P<title>{TITLE})\b"
    ))
    .unwrap()
});

static TITLE_THEN_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?P<title>{TITLE}),?\s+(?P<name>{NAME})")).unwrap()
});

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b{TITLE}\b")).unwrap());

/// Capitalised words that belong to titles, never to names
const TITLE_WORDS: &[&str] = &[
    "Vice", "President", "Director", "Manager", "Chief", "Officer", "Senior", "Executive",
    "Head", "Property", "Regional", "General", "Owner", "Founder", "Principal",
];

/// Capitalised sentence openers that the name pattern can swallow
const NAME_STOPWORDS: &[&str] = &[
    "Yesterday", "Today", "Tomorrow", "Tonight", "Morning", "Afternoon", "Evening", "Thanks", "Thank",
    "Hi", "Hello", "Hey", "Dear", "And", "But", "So", "Also", "Then", "Yes", "No", "Well", "Okay",
    "Actually", "Honestly", "Maybe", "Please", "Ask", "Call", "Email", "Meet", "Our", "Their", "The",
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "Last", "Next",
];

const EXECUTIVE_MARKERS: &[&str] = &[
    "CEO", "CFO", "CTO", "COO", "CIO", "CRO", "Chief", "VP", "Vice", "President", "Founder",
    "Co-Founder", "Owner", "Principal",
];

/// Regex name and title extraction
#[derive(Debug, Clone, Default)]
pub struct DecisionMakerExtractor;

impl DecisionMakerExtractor {
    pub fn new() -> Self {
        Self
    }

    /// People and titles with buying authority, in order of appearance
    pub fn extract(&self, text: &str) -> Vec<DecisionMaker> {
        let mut found: Vec<(usize, DecisionMaker)> = Vec::new();
        let mut paired_spans: Vec<(usize, usize)> = Vec::new();

        for re in [&*NAME_THEN_TITLE_RE, &*TITLE_THEN_NAME_RE] {
            for caps in re.captures_iter(text) {
                let Some(name) = trim_name(&caps["name"]) else {
                    continue;
                };
                if name.split(' ').any(|w| TITLE_WORDS.contains(&w)) {
                    continue;
                }
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                if paired_spans
                    .iter()
                    .any(|&(s, e)| whole.start() < e && whole.end() > s)
                {
                    continue;
                }
                paired_spans.push((whole.start(), whole.end()));
                found.push((
                    whole.start(),
                    DecisionMaker {
                        name: Some(name.to_string()),
                        title: Some(caps["title"].to_string()),
                    },
                ));
            }
        }

        for m in TITLE_RE.find_iter(text) {
            let covered = paired_spans
                .iter()
                .any(|&(s, e)| m.start() >= s && m.end() <= e);
            if !covered {
                found.push((
                    m.start(),
                    DecisionMaker {
                        name: None,
                        title: Some(m.as_str().to_string()),
                    },
                ));
            }
        }

        found.sort_by_key(|(start, _)| *start);

        let mut makers: Vec<DecisionMaker> = Vec::new();
        for (_, maker) in found {
            if !makers.contains(&maker) {
                makers.push(maker);
            }
        }
        makers
    }

    /// Display labels for `extract`, e.g. "Sarah Chen (CFO)"
    pub fn extract_labels(&self, text: &str) -> Vec<String> {
        self.extract(text).iter().map(DecisionMaker::label).collect()
    }
}

/// Drop leading sentence openers; `None` when nothing of the name is left
fn trim_name(name: &str) -> Option<&str> {
    let mut rest = name;
    while let Some((first, tail)) = rest.split_once(' ') {
        if !NAME_STOPWORDS.contains(&first) {
            break;
        }
        rest = tail;
    }
    if NAME_STOPWORDS.contains(&rest) {
        None
    } else {
        Some(rest)
    }
}

/// Highest authority among the extracted titles
pub fn authority_level(makers: &[DecisionMaker]) -> AuthorityLevel {
    if makers.is_empty() {
        return AuthorityLevel::None;
    }

    let executive = makers
        .iter()
        .filter_map(|m| m.title.as_deref())
        .any(|title| title.split(' ').any(|w| EXECUTIVE_MARKERS.contains(&w)));

    if executive {
        AuthorityLevel::Executive
    } else {
        AuthorityLevel::Management
    }
}

impl Scorer for DecisionMakerExtractor {
    type Output = Vec<String>;

    fn name(&self) -> &'static str {
        "decision_makers"
    }

    fn score(&self, text: &str) -> Result<Vec<String>, PipelineError> {
        Ok(self.extract_labels(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_then_title() {
        let extractor = DecisionMakerExtractor::new();
        let labels = extractor.extract_labels("I'll loop in Sarah Chen, our CFO, before Friday.");

        assert_eq!(labels, vec!["Sarah Chen (CFO)"]);
    }

    #[test]
    fn test_title_then_name() {
        let extractor = DecisionMakerExtractor::new();
        let labels = extractor.extract_labels("VP of Operations Mark Davis has final say.");

        assert_eq!(labels, vec!["Mark Davis (VP of Operations)"]);
    }

    #[test]
    fn test_standalone_titles_and_order() {
        let extractor = DecisionMakerExtractor::new();
        let makers = extractor.extract("Our Regional Manager likes it, but Tom Baker is the CEO and he decides.");

        assert_eq!(makers.len(), 2);
        assert_eq!(makers[0].title.as_deref(), Some("Regional Manager"));
        assert!(makers[0].name.is_none());
        assert_eq!(makers[1].name.as_deref(), Some("Tom Baker"));
        assert_eq!(authority_level(&makers), AuthorityLevel::Executive);
    }

    #[test]
    fn test_management_authority() {
        let extractor = DecisionMakerExtractor::new();
        let makers = extractor.extract("The Property Manager will review it.");

        assert_eq!(authority_level(&makers), AuthorityLevel::Management);
        assert_eq!(authority_level(&[]), AuthorityLevel::None);
    }

    #[test]
    fn test_no_decision_makers() {
        let extractor = DecisionMakerExtractor::new();
        assert!(extractor.extract_labels("we talked about the weather").is_empty());
    }

    #[test]
    fn test_sentence_openers_not_part_of_name() {
        let extractor = DecisionMakerExtractor::new();
        let labels = extractor
            .extract_labels("Yesterday Sarah Chen, our CFO, approved it. Thanks Mark Davis, the CEO.");

        assert_eq!(labels, vec!["Sarah Chen (CFO)", "Mark Davis (CEO)"]);
    }

    #[test]
    fn test_trim_name() {
        assert_eq!(trim_name("Thanks Mark Davis"), Some("Mark Davis"));
        assert_eq!(trim_name("Yesterday Morning Sarah"), Some("Sarah"));
        assert_eq!(trim_name("Sarah Chen"), Some("Sarah Chen"));
        assert_eq!(trim_name("Hello Then"), None);
    }
}
