use std::sync::Arc;

use bias::{
    bootstrap_means, confidence_interval, dedupe, defined_scores, mean, outlet_report,
    CachedClassifier, CommandClassifier, CorpusResult, GroupError, Pipeline, TermClassifier,
};
use futures::StreamExt;
use log::info;
use logging::{pink, purple};
use persistance::{
    parse_location, read_corpus_file, write_results_file, Classifier, Config, CorpusError,
};
use thiserror::Error;

const PROGRESS_EVERY: usize = 100;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("invalid keyword groups")]
    Groups(#[from] GroupError),
    #[error("corpus error")]
    Corpus(#[from] CorpusError),
}

pub async fn analyze(config: &Config, show_report: bool) -> Result<(), AnalysisError> {
    let groups = config.group_pair()?;
    purple(&format!(
        "Sentiment bias: {} (A) vs {} (B), positive favors {}",
        groups.a.name, groups.b.name, groups.b.name
    ));
    let input = parse_location(&config.general.input);
    let corpus = read_corpus_file(&input, &config.columns)?;
    let mut documents = corpus.documents;
    info!("Read {} articles from {:?}", documents.len(), input);
    if config.corpus.dedupe {
        let before = documents.len();
        documents = dedupe(documents);
        info!("Dropped {} duplicate rows", before - documents.len());
    }

    let pipeline = Pipeline::new(
        groups,
        build_classifier(&config.classifier),
        config.pipeline_options(),
    );
    let total = documents.len();
    let mut results = Vec::with_capacity(total);
    let mut scored = Box::pin(pipeline.results(documents));
    while let Some(result) = scored.next().await {
        results.push(result);
        if results.len() % PROGRESS_EVERY == 0 {
            info!("Scored {}/{} articles", results.len(), total);
        }
    }
    let undefined = results.iter().filter(|r| r.bias.is_undefined()).count();
    info!(
        "{} articles scored, {} without mentions of either group",
        results.len(),
        undefined
    );

    let output = parse_location(&config.general.output);
    write_results_file(&output, &corpus.headers, &results)?;
    info!("Wrote results to {:?}", output);

    if show_report {
        print_report(&results, config.corpus.bootstrap_rounds);
    }
    Ok(())
}

fn build_classifier(config: &Classifier) -> Arc<dyn TermClassifier> {
    let command = CommandClassifier::new(config.command.clone(), config.args.clone());
    if config.cache {
        Arc::new(CachedClassifier::new(command))
    } else {
        Arc::new(command)
    }
}

fn print_report(results: &[CorpusResult], rounds: usize) {
    let mut rng = rand::thread_rng();
    pink("Outlets");
    println!(
        "{:<24} {:>6} {:>6} {:>8} {:>18} {:>6} {:>6} {:>8}",
        "outlet", "docs", "scored", "mean SB", "95% interval", "n A", "n B", "diff"
    );
    for summary in outlet_report(results) {
        let means = bootstrap_means(&summary.scores, summary.scores.len(), rounds, &mut rng);
        println!(
            "{:<24} {:>6} {:>6} {:>8} {:>18} {:>6} {:>6} {:>8.3}",
            summary.outlet,
            summary.documents,
            summary.scored,
            format_score(summary.mean_bias),
            format_interval(confidence_interval(&means, 0.95)),
            summary.a.total,
            summary.b.total,
            summary.mention_difference
        );
    }
    let scores = defined_scores(results);
    let means = bootstrap_means(&scores, scores.len(), rounds, &mut rng);
    println!(
        "\nCorpus mean SB {} {}",
        format_score(mean(&scores)),
        format_interval(confidence_interval(&means, 0.95))
    );
}

fn format_score(score: Option<f64>) -> String {
    score
        .map(|s| format!("{:.3}", s))
        .unwrap_or_else(|| String::from("-"))
}

fn format_interval(interval: Option<(f64, f64)>) -> String {
    interval
        .map(|(low, high)| format!("[{:.3}, {:.3}]", low, high))
        .unwrap_or_else(|| String::from("-"))
}
