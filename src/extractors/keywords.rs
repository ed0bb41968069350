//! Word-bounded keyword matching shared by every chunker and extractor.
//!
//! Haystacks are expected to be lowercased already; terms are lowercase and
//! may contain spaces ("rent collection").

/// Count word-bounded occurrences of `term` in `haystack`
pub fn count_term(haystack: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut start = 0;

    while let Some(pos) = haystack[start..].find(term) {
        let begin = start + pos;
        let end = begin + term.len();

        let before_ok = haystack[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());

        if before_ok && after_ok {
            count += 1;
        }
        start = end;
    }

    count
}

pub fn contains_term(haystack: &str, term: &str) -> bool {
    count_term(haystack, term) > 0
}

/// Total occurrences of all terms
pub fn count_terms(haystack: &str, terms: &[&str]) -> usize {
    terms.iter().map(|t| count_term(haystack, t)).sum()
}

/// Terms that occur at least once, in list order
pub fn matched_terms<'a>(haystack: &str, terms: &[&'a str]) -> Vec<&'a str> {
    terms
        .iter()
        .copied()
        .filter(|t| contains_term(haystack, t))
        .collect()
}

/// Number of distinct terms that occur
pub fn distinct_matches(haystack: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|t| contains_term(haystack, t)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_term_respects_word_boundaries() {
        assert_eq!(count_term("wholesale sale on sales", "sale"), 1);
        assert_eq!(count_term("rent, rent and more rent.", "rent"), 3);
        assert_eq!(count_term("parent current", "rent"), 0);
        assert_eq!(count_term("anything", ""), 0);
    }

    #[test]
    fn test_phrases() {
        let text = "we need better rent collection and rent-collection reporting";
        assert_eq!(count_term(text, "rent collection"), 1);
        assert!(contains_term(text, "reporting"));
    }

    #[test]
    fn test_matched_terms_keeps_list_order() {
        let text = "the api and the crm integration";
        let matched = matched_terms(text, &["integration", "crm", "salesforce", "api"]);
        assert_eq!(matched, vec!["integration", "crm", "api"]);
        assert_eq!(distinct_matches(text, &["api", "api", "crm"]), 3);
    }
}
