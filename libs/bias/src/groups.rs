use log::warn;
use text::KeywordSet;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GroupError {
    #[error("keywords {0:?} belong to both groups")]
    Overlap(Vec<String>),
}

/// A political group whose mentions are scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub keywords: KeywordSet,
}

impl Group {
    pub fn new(name: impl Into<String>, keywords: KeywordSet) -> Self {
        Group {
            name: name.into(),
            keywords,
        }
    }
}

/// The two groups of an analysis run. Scores are positive when sentiment favors `b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPair {
    pub a: Group,
    pub b: Group,
}

impl GroupPair {
    /// Rejects groups that share a keyword, since a shared keyword would count the same term
    /// toward both groups.
    pub fn new(a: Group, b: Group) -> Result<Self, GroupError> {
        let shared = shared_keywords(&a, &b);
        if !shared.is_empty() {
            return Err(GroupError::Overlap(shared));
        }
        Ok(GroupPair { a, b })
    }

    /// Accepts overlapping groups, logging the shared keywords.
    pub fn allowing_overlap(a: Group, b: Group) -> Self {
        let shared = shared_keywords(&a, &b);
        if !shared.is_empty() {
            warn!(
                "{} and {} share keywords {:?}; those mentions count for both",
                a.name, b.name, shared
            );
        }
        GroupPair { a, b }
    }
}

fn shared_keywords(a: &Group, b: &Group) -> Vec<String> {
    a.keywords
        .overlap(&b.keywords)
        .into_iter()
        .map(|w| w.to_owned())
        .collect()
}
