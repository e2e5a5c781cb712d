use std::collections::HashSet;

use crate::normalizer::normalize_keyword;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// At least one keyword appears in the term.
    Any,
    /// Every keyword appears in the term.
    All,
}

/// The name variants of one political group, in the order they were configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: Vec<String>,
    lookup: HashSet<String>,
}

impl KeywordSet {
    /// Builds a set from keywords that are already normalized.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = KeywordSet::default();
        for word in words {
            let word = word.into();
            if set.lookup.insert(word.clone()) {
                set.words.push(word);
            }
        }
        set
    }

    /// Builds a set from raw keywords, normalizing each one the same way document text is.
    /// Keywords that normalize to nothing are dropped.
    pub fn normalized<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        KeywordSet::new(
            words
                .into_iter()
                .map(|w| normalize_keyword(w.as_ref()))
                .filter(|w| !w.is_empty()),
        )
    }

    pub fn contains(&self, token: &str) -> bool {
        self.lookup.contains(token)
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.as_str())
    }

    /// Keywords present in both sets, in this set's order.
    pub fn overlap<'a>(&'a self, other: &KeywordSet) -> Vec<&'a str> {
        self.iter().filter(|w| other.contains(w)).collect()
    }
}

/// Decides whether `term` is in scope for a group.
///
/// The term is split on whitespace (spaces, newlines, tabs) and the distinct tokens are intersected with `keywords`.
/// With no keywords, `All` is vacuously true and `Any` is false.
/// Comparison is exact; normalize the term and the keywords beforehand.
pub fn matches(term: &str, keywords: &KeywordSet, mode: MatchMode) -> bool {
    let tokens = term.split_whitespace().collect::<HashSet<&str>>();
    let shared = tokens.iter().filter(|t| keywords.contains(t)).count();
    match mode {
        MatchMode::Any => shared > 0,
        MatchMode::All => shared == keywords.len(),
    }
}
