//! Query-term extraction and highlighting for displaying retrieved passages.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

fn word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("static regex"))
}

/// Up to `n` distinct lowercase words of `query` longer than two characters,
/// in order of first appearance.
pub fn query_terms(query: &str, n: usize) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for m in word().find_iter(query) {
        if terms.len() == n {
            break;
        }
        let w = m.as_str().to_lowercase();
        if w.chars().count() > 2 && !terms.contains(&w) {
            terms.push(w);
        }
    }
    terms
}

/// Wrap every case-insensitive occurrence of any term in `open`/`close`.
/// Longer terms win where terms overlap; the matched text keeps its case.
pub fn highlight_terms(text: &str, terms: &[String], open: &str, close: &str) -> String {
    let mut sorted: Vec<&str> = terms.iter().map(String::as_str).filter(|t| !t.is_empty()).collect();
    if sorted.is_empty() {
        return text.to_string();
    }
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    let pattern = sorted.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &regex::Captures<'_>| format!("{open}{}{close}", &caps[0]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_skip_short_words_and_repeats() {
        assert_eq!(query_terms("What is the limit of the Limit?", 6), vec!["what", "the", "limit"]);
        assert_eq!(query_terms("alpha beta gamma delta", 2), vec!["alpha", "beta"]);
        assert!(query_terms("a an is", 5).is_empty());
    }

    #[test]
    fn highlight_is_case_insensitive_and_prefers_longer_terms() {
        let terms = vec!["cat".to_string(), "cats".to_string()];
        assert_eq!(highlight_terms("Cats and a cat", &terms, "<b>", "</b>"), "<b>Cats</b> and a <b>cat</b>");
    }

    #[test]
    fn terms_with_regex_metacharacters_are_literal() {
        let terms = vec!["c++".to_string()];
        assert_eq!(highlight_terms("learn C++ now", &terms, "[", "]"), "learn [C++] now");
        assert_eq!(highlight_terms("unchanged", &[], "[", "]"), "unchanged");
    }
}
