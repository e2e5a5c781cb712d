use std::{collections::HashMap, io::ErrorKind, process::Stdio, sync::Arc, time::Duration};

use async_trait::async_trait;
use log::debug;
use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command, sync::Mutex, time::timeout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Other,
}

impl Sentiment {
    /// Reads a classifier label such as `POS`, `negative` or `NEU`.
    /// Anything that is not a positive or negative label is `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "POS" | "POSITIVE" => Sentiment::Positive,
            "NEG" | "NEGATIVE" => Sentiment::Negative,
            _ => Sentiment::Other,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classification timed out after {0:?}")]
    Timeout(Duration),
    #[error("could not run classifier command")]
    Io(#[from] std::io::Error),
    #[error("classifier command failed: {0}")]
    Failed(String),
}

/// Labels a single term. Implementations must be deterministic per term and safe to share
/// between workers.
#[async_trait]
pub trait TermClassifier: Send + Sync {
    async fn classify(&self, term: &str) -> Result<Sentiment, ClassifierError>;
}

#[async_trait]
impl<T: TermClassifier + ?Sized> TermClassifier for Arc<T> {
    async fn classify(&self, term: &str) -> Result<Sentiment, ClassifierError> {
        (**self).classify(term).await
    }
}

/// Runs an external program once per term. The term is written to the program's stdin and the
/// first whitespace separated token of its stdout is read as the label.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    program: String,
    args: Vec<String>,
}

impl CommandClassifier {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandClassifier {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl TermClassifier for CommandClassifier {
    async fn classify(&self, term: &str) -> Result<Sentiment, ClassifierError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // the program may answer without reading its input
            if let Err(err) = stdin.write_all(term.as_bytes()).await {
                if err.kind() != ErrorKind::BrokenPipe {
                    return Err(err.into());
                }
            }
        }
        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(ClassifierError::Failed(output.status.to_string()));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .split_whitespace()
            .next()
            .map(Sentiment::from_label)
            .unwrap_or(Sentiment::Other))
    }
}

/// Bounds every call of the wrapped classifier.
pub struct TimeoutClassifier<C> {
    inner: C,
    limit: Duration,
}

impl<C> TimeoutClassifier<C> {
    pub fn new(inner: C, limit: Duration) -> Self {
        TimeoutClassifier { inner, limit }
    }
}

#[async_trait]
impl<C: TermClassifier> TermClassifier for TimeoutClassifier<C> {
    async fn classify(&self, term: &str) -> Result<Sentiment, ClassifierError> {
        match timeout(self.limit, self.inner.classify(term)).await {
            Ok(result) => result,
            Err(_) => Err(ClassifierError::Timeout(self.limit)),
        }
    }
}

/// Remembers successful classifications so repeated terms reach the wrapped classifier once.
/// Failures are not cached.
pub struct CachedClassifier<C> {
    inner: C,
    seen: Mutex<HashMap<String, Sentiment>>,
}

impl<C> CachedClassifier<C> {
    pub fn new(inner: C) -> Self {
        CachedClassifier {
            inner,
            seen: Mutex::new(HashMap::new()),
        }
    }

    pub async fn cached_terms(&self) -> usize {
        self.seen.lock().await.len()
    }
}

#[async_trait]
impl<C: TermClassifier> TermClassifier for CachedClassifier<C> {
    async fn classify(&self, term: &str) -> Result<Sentiment, ClassifierError> {
        if let Some(sentiment) = self.seen.lock().await.get(term) {
            debug!("cache hit for {:?}", term);
            return Ok(*sentiment);
        }
        let sentiment = self.inner.classify(term).await?;
        self.seen.lock().await.insert(term.to_owned(), sentiment);
        Ok(sentiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingClassifier, MapClassifier, StallingClassifier};

    #[test]
    fn reads_labels() {
        assert_eq!(Sentiment::from_label("POS"), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("negative\n"), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("NEU"), Sentiment::Other);
        assert_eq!(Sentiment::from_label(""), Sentiment::Other);
    }

    #[tokio::test]
    async fn times_out_stalled_calls() {
        let classifier = TimeoutClassifier::new(StallingClassifier, Duration::from_millis(10));
        let result = classifier.classify("macri es malo").await;
        assert!(matches!(result, Err(ClassifierError::Timeout(_))));
    }

    #[tokio::test]
    async fn passes_through_fast_calls() {
        let inner = MapClassifier::new(&[("alberto es bueno", Sentiment::Positive)]);
        let classifier = TimeoutClassifier::new(inner, Duration::from_secs(5));
        let result = classifier.classify("alberto es bueno").await.unwrap();
        assert_eq!(result, Sentiment::Positive);
    }

    #[tokio::test]
    async fn caches_repeated_terms() {
        let counting = Arc::new(CountingClassifier::new(Sentiment::Negative));
        let cached = CachedClassifier::new(counting.clone());
        for _ in 0..3 {
            assert_eq!(cached.classify("macri").await.unwrap(), Sentiment::Negative);
        }
        assert_eq!(cached.classify("pichetto").await.unwrap(), Sentiment::Negative);
        assert_eq!(counting.calls(), 2);
        assert_eq!(cached.cached_terms().await, 2);
    }

    #[tokio::test]
    async fn does_not_cache_failures() {
        let cached = CachedClassifier::new(TimeoutClassifier::new(
            StallingClassifier,
            Duration::from_millis(5),
        ));
        assert!(cached.classify("macri").await.is_err());
        assert_eq!(cached.cached_terms().await, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_external_command() {
        let classifier = CommandClassifier::new("sh", vec!["-c".into(), "echo NEG".into()]);
        let result = classifier.classify("macri es malo").await.unwrap();
        assert_eq!(result, Sentiment::Negative);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn echoes_term_through_command() {
        let classifier = CommandClassifier::new("cat", vec![]);
        assert_eq!(classifier.classify("POS").await.unwrap(), Sentiment::Positive);
        assert_eq!(classifier.classify("hola").await.unwrap(), Sentiment::Other);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reports_failing_command() {
        let classifier = CommandClassifier::new("sh", vec!["-c".into(), "exit 3".into()]);
        assert!(classifier.classify("macri").await.is_err());
    }
}
