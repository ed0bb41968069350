use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::extractors::keywords::contains_term;
use crate::models::{Chunk, ChunkType, NameType, SpeakerMetadata};

static TIMESTAMP_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\[(]?\d{1,2}:\d{2}(?::\d{2})?[\])]?\s+").unwrap());

static WITH_ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<speaker>[A-Z][\w'.\-]*(?: [A-Z][\w'.\-]*)*)\s*\((?P<role>[^)]+)\)\s*:\s*(?P<text>.*)$")
        .unwrap()
});

static FULL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<speaker>[A-Z][a-z'\-]+(?: [A-Z][a-z'\-]+)+)\s*:\s*(?P<text>.*)$").unwrap()
});

static INITIALS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<speaker>(?:[A-Z]\.\s?){1,3})\s*:\s*(?P<text>.*)$").unwrap()
});

static SINGLE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<speaker>[A-Za-z][\w'\-]{0,30}(?: \d{1,2})?)\s*:\s*(?P<text>.*)$").unwrap()
});

static ROLE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:speaker|participant|rep|customer|client|host|guest|interviewer|agent|prospect)\b")
        .unwrap()
});

static SELF_INTRO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?i:i'?m|i am) (?:the |a |an )?(?P<role>[A-Za-z][A-Za-z ]{1,40}?) (?:at|with|from) (?P<company>[A-Z][\w&.\-]*(?: [A-Z][\w&.\-]*)*)",
    )
    .unwrap()
});

/// Labels that look like speakers but are not
const NON_SPEAKER_LABELS: &[&str] = &["http", "https", "note", "subject", "re", "date", "time"];

const ROLE_WORDS: &[&str] = &[
    "manager", "director", "vp", "ceo", "cfo", "coo", "cto", "owner", "head", "lead",
    "president", "founder", "coordinator", "analyst", "engineer", "executive", "specialist",
    "representative", "rep", "supervisor", "officer",
];

/// Configuration for speaker boundary chunking
#[derive(Debug, Clone)]
pub struct SpeakerChunkerConfig {
    /// Turns with less text than this (in chars) are dropped
    pub min_chunk_length: usize,
    /// Raw lines kept on each side of a turn
    pub context_lines: usize,
    /// Markers identifying our own organisation in names, roles or companies
    pub internal_markers: Vec<String>,
}

impl Default for SpeakerChunkerConfig {
    fn default() -> Self {
        Self {
            min_chunk_length: 10,
            context_lines: 2,
            internal_markers: vec![
                "pay ready".to_string(),
                "payready".to_string(),
                "sophia".to_string(),
            ],
        }
    }
}

/// A speaker prefix recognised on a transcript line
#[derive(Debug, Clone, PartialEq)]
struct SpeakerLine {
    speaker: String,
    utterance: String,
    parenthetical: Option<String>,
}

/// A turn being accumulated
#[derive(Debug)]
struct OpenTurn {
    line: SpeakerLine,
    text: String,
    start_line: usize,
    end_line: usize,
}

/// Splits multi-speaker transcripts at speaker-turn markers
#[derive(Debug, Clone, Default)]
pub struct SpeakerBoundaryChunker {
    config: SpeakerChunkerConfig,
}

impl SpeakerBoundaryChunker {
    pub fn new(config: SpeakerChunkerConfig) -> Self {
        Self { config }
    }

    /// Split a transcript into per-turn chunks, in transcript order
    ///
    /// Lines before the first recognisable speaker are dropped, so a
    /// transcript without speaker markers yields no chunks.
    pub fn chunk(&self, transcript: &str) -> Vec<Chunk> {
        let lines: Vec<&str> = transcript.lines().map(str::trim).collect();
        let mut turns: Vec<OpenTurn> = Vec::new();
        let mut current: Option<OpenTurn> = None;
        let mut dropped = 0usize;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }

            if let Some(speaker_line) = match_speaker_line(line) {
                if let Some(turn) = current.take() {
                    self.flush(turn, &mut turns);
                }
                current = Some(OpenTurn {
                    text: speaker_line.utterance.clone(),
                    line: speaker_line,
                    start_line: i,
                    end_line: i,
                });
            } else if let Some(turn) = current.as_mut() {
                if !turn.text.is_empty() {
                    turn.text.push(' ');
                }
                turn.text.push_str(line);
                turn.end_line = i;
            } else {
                dropped += 1;
            }
        }

        if let Some(turn) = current.take() {
            self.flush(turn, &mut turns);
        }

        if dropped > 0 {
            debug!("Dropped {} lines before the first speaker", dropped);
        }

        turns
            .into_iter()
            .map(|turn| self.build_chunk(turn, &lines))
            .collect()
    }

    fn flush(&self, turn: OpenTurn, turns: &mut Vec<OpenTurn>) {
        if turn.text.chars().count() >= self.config.min_chunk_length {
            turns.push(turn);
        }
    }

    fn build_chunk(&self, turn: OpenTurn, lines: &[&str]) -> Chunk {
        let k = self.config.context_lines;

        let mut context_before: Vec<String> = lines[..turn.start_line]
            .iter()
            .rev()
            .filter(|l| !l.is_empty())
            .take(k)
            .map(|l| l.to_string())
            .collect();
        context_before.reverse();

        let context_after: Vec<String> = lines[turn.end_line + 1..]
            .iter()
            .filter(|l| !l.is_empty())
            .take(k)
            .map(|l| l.to_string())
            .collect();

        let speaker_metadata = self.speaker_metadata(&turn.line);

        let mut chunk = Chunk::new(turn.text, ChunkType::SpeakerBoundary).with_speaker(turn.line.speaker);
        chunk.context_before = context_before;
        chunk.context_after = context_after;
        chunk.speaker_metadata = Some(speaker_metadata);
        chunk
    }

    fn speaker_metadata(&self, line: &SpeakerLine) -> SpeakerMetadata {
        let (mut role, mut company) = match &line.parenthetical {
            Some(p) => match p.split_once(',') {
                Some((r, c)) => (Some(r.trim().to_string()), Some(c.trim().to_string())),
                None => (Some(p.trim().to_string()), None),
            },
            None => (None, None),
        };

        if role.is_none() {
            if let Some(caps) = SELF_INTRO_RE.captures(&line.utterance) {
                let candidate = caps["role"].trim().to_lowercase();
                if ROLE_WORDS.iter().any(|w| contains_term(&candidate, w)) {
                    role = Some(caps["role"].trim().to_string());
                    company = Some(caps["company"].trim().to_string());
                }
            }
        }

        let haystack = format!(
            "{} {} {}",
            line.speaker,
            role.as_deref().unwrap_or(""),
            company.as_deref().unwrap_or("")
        )
        .to_lowercase();
        let is_internal = self
            .config
            .internal_markers
            .iter()
            .any(|m| contains_term(&haystack, &m.to_lowercase()));

        SpeakerMetadata {
            name_type: classify_name(&line.speaker),
            is_internal,
            role,
            company,
        }
    }
}

/// Try each speaker pattern in turn against a trimmed line
fn match_speaker_line(line: &str) -> Option<SpeakerLine> {
    let line = match TIMESTAMP_PREFIX_RE.find(line) {
        Some(prefix) => &line[prefix.end()..],
        None => line,
    };

    if let Some(caps) = WITH_ROLE_RE.captures(line) {
        let speaker = caps["speaker"].trim();
        if is_valid_speaker(speaker) {
            return Some(SpeakerLine {
                speaker: speaker.to_string(),
                utterance: caps["text"].trim().to_string(),
                parenthetical: Some(caps["role"].trim().to_string()),
            });
        }
    }

    for re in [&*FULL_NAME_RE, &*INITIALS_RE, &*SINGLE_WORD_RE] {
        if let Some(caps) = re.captures(line) {
            let speaker = caps["speaker"].trim();
            if is_valid_speaker(speaker) {
                return Some(SpeakerLine {
                    speaker: speaker.to_string(),
                    utterance: caps["text"].trim().to_string(),
                    parenthetical: None,
                });
            }
        }
    }

    None
}

/// Reject pure numbers, letterless labels, 1-2 letter abbreviations and known non-speakers
fn is_valid_speaker(name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() || !name.chars().any(char::is_alphabetic) {
        return false;
    }
    if name.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
        return false;
    }
    if name.chars().count() <= 2 && name.chars().all(char::is_alphabetic) {
        return false;
    }
    !NON_SPEAKER_LABELS.contains(&name.to_lowercase().as_str())
}

fn classify_name(name: &str) -> NameType {
    if ROLE_LABEL_RE.is_match(name) {
        NameType::RoleLabel
    } else if name.contains('.')
        && name
            .split(|c: char| c == '.' || c.is_whitespace())
            .all(|part| part.chars().count() <= 1)
    {
        NameType::Initials
    } else if name.split_whitespace().count() >= 2 {
        NameType::FullName
    } else {
        NameType::SingleName
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_turn_transcript() {
        let chunker = SpeakerBoundaryChunker::default();
        let chunks = chunker.chunk(
            "Alice Smith: Hello there.\nBob Jones: Hi Alice, how are you?\nAlice Smith: I'm good, thanks.",
        );

        assert_eq!(chunks.len(), 3);
        let speakers: Vec<_> = chunks.iter().map(|c| c.speaker.as_deref().unwrap()).collect();
        assert_eq!(speakers, vec!["Alice Smith", "Bob Jones", "Alice Smith"]);
        assert!(chunks[0].text.contains("Hello there."));
        assert!(chunks[1].text.contains("how are you?"));
        assert!(chunks[2].text.contains("I'm good, thanks."));
        assert!(chunks.iter().all(|c| c.chunk_type == ChunkType::SpeakerBoundary));
    }

    #[test]
    fn test_continuation_lines_and_context() {
        let chunker = SpeakerBoundaryChunker::default();
        let chunks = chunker.chunk(
            "Preamble without a speaker\n\
             Dana: We looked at three vendors last quarter.\n\
             Honestly the pricing was all over the place.\n\
             Eric Wu: Understood, let me walk you through ours.",
        );

        assert_eq!(chunks.len(), 2);
        assert_eq!(
            chunks[0].text,
            "We looked at three vendors last quarter. Honestly the pricing was all over the place."
        );
        assert_eq!(chunks[0].context_before, vec!["Preamble without a speaker"]);
        assert_eq!(
            chunks[0].context_after,
            vec!["Eric Wu: Understood, let me walk you through ours."]
        );
        assert_eq!(chunks[1].context_before.len(), 2);
    }

    #[test]
    fn test_short_turns_are_dropped() {
        let chunker = SpeakerBoundaryChunker::default();
        let chunks = chunker.chunk("Alice Smith: Yes.\nBob Jones: Great, I will send it over today.");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].speaker.as_deref(), Some("Bob Jones"));
    }

    #[test]
    fn test_empty_and_speakerless_transcripts() {
        let chunker = SpeakerBoundaryChunker::default();

        assert!(chunker.chunk("").is_empty());
        assert!(chunker
            .chunk("just some notes\nwith no speakers at all\n12: not a speaker either")
            .is_empty());
    }

    #[test]
    fn test_speaker_validation() {
        assert!(is_valid_speaker("Alice Smith"));
        assert!(is_valid_speaker("J.S."));
        assert!(is_valid_speaker("Speaker 1"));
        assert!(!is_valid_speaker("42"));
        assert!(!is_valid_speaker("OK"));
        assert!(!is_valid_speaker("Q"));
        assert!(!is_valid_speaker("Note"));
        assert!(!is_valid_speaker("--"));
    }

    #[test]
    fn test_speaker_patterns() {
        let ts = match_speaker_line("[00:01:02] Alice Smith: Let's begin.").unwrap();
        assert_eq!(ts.speaker, "Alice Smith");
        assert_eq!(ts.utterance, "Let's begin.");

        let initials = match_speaker_line("J.S.: Sounds right to me.").unwrap();
        assert_eq!(initials.speaker, "J.S.");

        let role = match_speaker_line("Maria Lopez (VP Operations, Greystar): We have 40 sites.").unwrap();
        assert_eq!(role.speaker, "Maria Lopez");
        assert_eq!(role.parenthetical.as_deref(), Some("VP Operations, Greystar"));

        assert!(match_speaker_line("https://example.com/path").is_none());
        assert!(match_speaker_line("no colon here").is_none());
    }

    #[test]
    fn test_speaker_metadata() {
        let chunker = SpeakerBoundaryChunker::default();
        let chunks = chunker.chunk(
            "Maria Lopez (VP Operations, Greystar): We have forty communities.\n\
             Tom: I'm the account executive at Pay Ready, happy to help.\n\
             Speaker 2: Can you share the pricing sheet?",
        );

        let maria = chunks[0].speaker_metadata.as_ref().unwrap();
        assert_eq!(maria.name_type, NameType::FullName);
        assert_eq!(maria.role.as_deref(), Some("VP Operations"));
        assert_eq!(maria.company.as_deref(), Some("Greystar"));
        assert!(!maria.is_internal);

        let tom = chunks[1].speaker_metadata.as_ref().unwrap();
        assert_eq!(tom.name_type, NameType::SingleName);
        assert_eq!(tom.role.as_deref(), Some("account executive"));
        assert_eq!(tom.company.as_deref(), Some("Pay Ready"));
        assert!(tom.is_internal);

        let generic = chunks[2].speaker_metadata.as_ref().unwrap();
        assert_eq!(generic.name_type, NameType::RoleLabel);
    }

    #[test]
    fn test_classify_initials() {
        assert_eq!(classify_name("J.S."), NameType::Initials);
        assert_eq!(classify_name("J. S."), NameType::Initials);
        assert_eq!(classify_name("Dr. Smith"), NameType::FullName);
    }

    #[test]
    fn test_long_transcript_context_window() {
        let transcript: String = (0..5000)
            .map(|i| format!("Alice Smith: Point number {} on the roadmap.\n\nBob Jones: Reply number {} noted.\n", i, i))
            .collect();
        let chunker = SpeakerBoundaryChunker::default();

        let started = std::time::Instant::now();
        let chunks = chunker.chunk(&transcript);
        assert!(started.elapsed() < std::time::Duration::from_secs(10));

        assert_eq!(chunks.len(), 10_000);
        let last = chunks.last().unwrap();
        assert_eq!(
            last.context_before,
            vec![
                "Bob Jones: Reply number 4998 noted.",
                "Alice Smith: Point number 4999 on the roadmap.",
            ]
        );
        assert!(last.context_after.is_empty());
    }
}
