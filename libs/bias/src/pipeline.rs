use std::{collections::HashSet, panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures::{stream, FutureExt, Stream, StreamExt};
use log::{debug, warn};
use text::normalize;

use crate::{
    classifier::{TermClassifier, TimeoutClassifier},
    counter::{count_terms, TermTally},
    groups::GroupPair,
    score::BiasScore,
};

/// One news article. `text` is `None` when the source row could not be read.
/// `fields` holds the whole source row so it can be written back next to the scores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    pub url: String,
    pub outlet: String,
    pub text: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorpusResult {
    pub url: String,
    pub outlet: String,
    pub fields: Vec<String>,
    pub bias: BiasScore,
    pub a: TermTally,
    pub b: TermTally,
}

impl CorpusResult {
    /// Result recorded for a document that could not be scored.
    pub fn placeholder(document: &Document) -> Self {
        CorpusResult {
            url: document.url.clone(),
            outlet: document.outlet.clone(),
            fields: document.fields.clone(),
            bias: BiasScore::Undefined,
            a: TermTally::default(),
            b: TermTally::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub separator: String,
    /// Documents scored at the same time.
    pub concurrency: usize,
    /// Limit for a single classifier call. `None` waits indefinitely.
    pub term_timeout: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            separator: String::from("."),
            concurrency: 8,
            term_timeout: Some(Duration::from_secs(5)),
        }
    }
}

#[derive(Clone)]
pub struct Pipeline {
    groups: Arc<GroupPair>,
    classifier: Arc<dyn TermClassifier>,
    options: Arc<PipelineOptions>,
}

impl Pipeline {
    pub fn new(
        groups: GroupPair,
        classifier: Arc<dyn TermClassifier>,
        options: PipelineOptions,
    ) -> Self {
        let classifier: Arc<dyn TermClassifier> = match options.term_timeout {
            Some(limit) => Arc::new(TimeoutClassifier::new(classifier, limit)),
            None => classifier,
        };
        Pipeline {
            groups: Arc::new(groups),
            classifier,
            options: Arc::new(options),
        }
    }

    pub fn groups(&self) -> &GroupPair {
        &self.groups
    }

    pub async fn score_document(&self, document: &Document) -> CorpusResult {
        let raw = match &document.text {
            Some(raw) => raw,
            None => {
                warn!("No readable text for {}, recording a placeholder", document.url);
                return CorpusResult::placeholder(document);
            }
        };
        let text = normalize(raw);
        let separator = &self.options.separator;
        let classifier = self.classifier.as_ref();
        let a = count_terms(&text, &self.groups.a.keywords, classifier, separator).await;
        let b = count_terms(&text, &self.groups.b.keywords, classifier, separator).await;
        let bias = BiasScore::from_tallies(&a, &b);
        debug!("{} scored {}", document.url, bias);
        CorpusResult {
            url: document.url.clone(),
            outlet: document.outlet.clone(),
            fields: document.fields.clone(),
            bias,
            a,
            b,
        }
    }

    /// Scores up to `concurrency` documents at a time and yields the results in input order.
    /// Scoring runs inside the stream, so dropping it early cancels the documents in flight
    /// and leaves the caller with the prefix already yielded.
    pub fn results(&self, documents: Vec<Document>) -> impl Stream<Item = CorpusResult> {
        let pipeline = self.clone();
        let concurrency = self.options.concurrency.max(1);
        stream::iter(documents)
            .map(move |document| {
                let pipeline = pipeline.clone();
                async move {
                    let scoring = AssertUnwindSafe(pipeline.score_document(&document));
                    match scoring.catch_unwind().await {
                        Ok(result) => result,
                        Err(_) => {
                            warn!("Scoring {} panicked, recording a placeholder", document.url);
                            CorpusResult::placeholder(&document)
                        }
                    }
                }
            })
            .buffered(concurrency)
    }

    pub async fn process_corpus(&self, documents: Vec<Document>) -> Vec<CorpusResult> {
        self.results(documents).collect::<Vec<CorpusResult>>().await
    }
}

/// Drops rows identical to an earlier one, keeping the first occurrence in place.
pub fn dedupe(documents: Vec<Document>) -> Vec<Document> {
    let keep = {
        let mut seen = HashSet::with_capacity(documents.len());
        documents.iter().map(|d| seen.insert(d)).collect::<Vec<bool>>()
    };
    documents
        .into_iter()
        .zip(keep)
        .filter(|(_, keep)| *keep)
        .map(|(document, _)| document)
        .collect()
}
