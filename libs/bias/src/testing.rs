use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;

use crate::classifier::{ClassifierError, Sentiment, TermClassifier};

/// Labels terms from a fixed table, comparing trimmed terms. Unknown terms are `Other`.
pub(crate) struct MapClassifier {
    labels: HashMap<String, Sentiment>,
}

impl MapClassifier {
    pub(crate) fn new(labels: &[(&str, Sentiment)]) -> Self {
        MapClassifier {
            labels: labels
                .iter()
                .map(|(term, sentiment)| (term.to_string(), *sentiment))
                .collect(),
        }
    }
}

#[async_trait]
impl TermClassifier for MapClassifier {
    async fn classify(&self, term: &str) -> Result<Sentiment, ClassifierError> {
        Ok(*self.labels.get(term.trim()).unwrap_or(&Sentiment::Other))
    }
}

/// Answers every term with the same label and counts how often it was asked.
pub(crate) struct CountingClassifier {
    answer: Sentiment,
    calls: AtomicUsize,
}

impl CountingClassifier {
    pub(crate) fn new(answer: Sentiment) -> Self {
        CountingClassifier {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TermClassifier for CountingClassifier {
    async fn classify(&self, _term: &str) -> Result<Sentiment, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

/// Never answers.
pub(crate) struct StallingClassifier;

#[async_trait]
impl TermClassifier for StallingClassifier {
    async fn classify(&self, _term: &str) -> Result<Sentiment, ClassifierError> {
        std::future::pending::<()>().await;
        Ok(Sentiment::Other)
    }
}

/// Always fails.
pub(crate) struct BrokenClassifier;

#[async_trait]
impl TermClassifier for BrokenClassifier {
    async fn classify(&self, _term: &str) -> Result<Sentiment, ClassifierError> {
        Err(ClassifierError::Failed("model unavailable".into()))
    }
}

/// Waits `delay` before answering terms that contain `slow_word`, and counts finished calls.
pub(crate) struct DelayedClassifier {
    slow_word: &'static str,
    delay: Duration,
    finished: AtomicUsize,
}

impl DelayedClassifier {
    pub(crate) fn new(slow_word: &'static str, delay: Duration) -> Self {
        DelayedClassifier {
            slow_word,
            delay,
            finished: AtomicUsize::new(0),
        }
    }

    pub(crate) fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TermClassifier for DelayedClassifier {
    async fn classify(&self, term: &str) -> Result<Sentiment, ClassifierError> {
        if term.contains(self.slow_word) {
            tokio::time::sleep(self.delay).await;
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(Sentiment::Other)
    }
}

/// Panics on terms that contain `trigger`, answers `Other` otherwise.
pub(crate) struct PanickingClassifier {
    trigger: &'static str,
}

impl PanickingClassifier {
    pub(crate) fn new(trigger: &'static str) -> Self {
        PanickingClassifier { trigger }
    }
}

#[async_trait]
impl TermClassifier for PanickingClassifier {
    async fn classify(&self, term: &str) -> Result<Sentiment, ClassifierError> {
        if term.contains(self.trigger) {
            panic!("classifier crashed on {:?}", term);
        }
        Ok(Sentiment::Other)
    }
}
