use std::ops::AddAssign;

use log::warn;
use text::{matches, split_terms, KeywordSet, MatchMode};

use crate::classifier::{Sentiment, TermClassifier};

/// Positive, negative and total in-scope terms of one group in one document.
/// Terms labelled `Other` only count toward `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermTally {
    pub positive: usize,
    pub negative: usize,
    pub total: usize,
}

impl AddAssign for TermTally {
    fn add_assign(&mut self, other: Self) {
        self.positive += other.positive;
        self.negative += other.negative;
        self.total += other.total;
    }
}

/// Splits `document` on `separator` and classifies, in order, every term that mentions one of
/// `keywords`. Terms without a mention are never sent to the classifier.
/// A failed classification counts the term as `Other`.
pub async fn count_terms(
    document: &str,
    keywords: &KeywordSet,
    classifier: &dyn TermClassifier,
    separator: &str,
) -> TermTally {
    let mut tally = TermTally::default();
    for term in split_terms(document, separator) {
        if !matches(term, keywords, MatchMode::Any) {
            continue;
        }
        tally.total += 1;
        match classifier.classify(term).await {
            Ok(Sentiment::Positive) => tally.positive += 1,
            Ok(Sentiment::Negative) => tally.negative += 1,
            Ok(Sentiment::Other) => {}
            Err(e) => warn!("Treating {:?} as neutral: {}", term, e),
        }
    }
    tally
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        classifier::TimeoutClassifier,
        testing::{BrokenClassifier, CountingClassifier, MapClassifier, StallingClassifier},
    };

    fn keywords(words: &[&str]) -> KeywordSet {
        KeywordSet::new(words.iter().copied())
    }

    async fn count(text: &str, words: &[&str], classifier: &dyn TermClassifier) -> TermTally {
        count_terms(text, &keywords(words), classifier, ".").await
    }

    #[tokio::test]
    async fn tallies_each_group() {
        let classifier = MapClassifier::new(&[
            ("alberto es bueno", Sentiment::Positive),
            ("macri es malo", Sentiment::Negative),
        ]);
        let text = "alberto es bueno. macri es malo.";
        let a = count_terms(text, &keywords(&["alberto"]), &classifier, ".").await;
        let b = count_terms(text, &keywords(&["macri"]), &classifier, ".").await;
        assert_eq!(a, TermTally { positive: 1, negative: 0, total: 1 });
        assert_eq!(b, TermTally { positive: 0, negative: 1, total: 1 });
    }

    #[tokio::test]
    async fn only_classifies_mentions() {
        let classifier = CountingClassifier::new(Sentiment::Positive);
        let text = "el clima. macri viajo. la economia. mauricio macri hablo. nada";
        let tally = count(text, &["macri", "mauricio"], &classifier).await;
        assert_eq!(classifier.calls(), 2);
        assert_eq!(tally, TermTally { positive: 2, negative: 0, total: 2 });
    }

    #[tokio::test]
    async fn no_mentions_no_calls() {
        let classifier = CountingClassifier::new(Sentiment::Negative);
        let tally = count("el clima. la economia.", &["macri"], &classifier).await;
        assert_eq!(tally, TermTally::default());
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn empty_keywords_never_match() {
        let classifier = CountingClassifier::new(Sentiment::Positive);
        let tally = count("macri. alberto. todo", &[], &classifier).await;
        assert_eq!(tally.total, 0);
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn neutral_terms_count_toward_total() {
        let classifier = MapClassifier::new(&[("macri gano", Sentiment::Positive)]);
        let text = "macri gano. macri viajo. macri hablo";
        let tally = count(text, &["macri"], &classifier).await;
        assert_eq!(tally, TermTally { positive: 1, negative: 0, total: 3 });
        assert!(tally.positive + tally.negative <= tally.total);
    }

    #[tokio::test]
    async fn failures_are_neutral() {
        let tally = count("macri. macri hablo", &["macri"], &BrokenClassifier).await;
        assert_eq!(tally, TermTally { positive: 0, negative: 0, total: 2 });
    }

    #[tokio::test]
    async fn timeouts_are_neutral() {
        let classifier = Arc::new(TimeoutClassifier::new(
            StallingClassifier,
            Duration::from_millis(5),
        ));
        let tally = count("alberto dijo. alberto hablo", &["alberto"], &classifier).await;
        assert_eq!(tally, TermTally { positive: 0, negative: 0, total: 2 });
    }

    #[tokio::test]
    async fn honors_separator() {
        let classifier = CountingClassifier::new(Sentiment::Negative);
        let text = "macri hablo\nmacri viajo. todo";
        let tally = count_terms(text, &keywords(&["macri"]), &classifier, "\n").await;
        assert_eq!(tally.total, 2);
        assert_eq!(tally.negative, 2);
    }

    #[test]
    fn adds_tallies() {
        let mut sum = TermTally { positive: 1, negative: 2, total: 4 };
        sum += TermTally { positive: 0, negative: 1, total: 1 };
        assert_eq!(sum, TermTally { positive: 1, negative: 3, total: 5 });
    }
}
