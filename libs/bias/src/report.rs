use std::collections::BTreeMap;

use rand::Rng;

use crate::{counter::TermTally, pipeline::CorpusResult};

pub const DEFAULT_BOOTSTRAP_ROUNDS: usize = 10000;

#[derive(Debug, Clone, PartialEq)]
pub struct OutletSummary {
    pub outlet: String,
    pub documents: usize,
    /// Documents with a defined bias.
    pub scored: usize,
    /// Mean over defined scores only.
    pub mean_bias: Option<f64>,
    pub a: TermTally,
    pub b: TermTally,
    /// This outlet's share of all group A mentions minus its share of all group B mentions.
    pub mention_difference: f64,
    /// Defined scores in input order, kept for resampling.
    pub scores: Vec<f64>,
}

/// Groups results by outlet. Rows are sorted by `mention_difference`, largest first.
pub fn outlet_report(results: &[CorpusResult]) -> Vec<OutletSummary> {
    let mut by_outlet: BTreeMap<&str, OutletSummary> = BTreeMap::new();
    for result in results {
        let summary = by_outlet
            .entry(result.outlet.as_str())
            .or_insert_with(|| OutletSummary {
                outlet: result.outlet.clone(),
                documents: 0,
                scored: 0,
                mean_bias: None,
                a: TermTally::default(),
                b: TermTally::default(),
                mention_difference: 0.0,
                scores: Vec::new(),
            });
        summary.documents += 1;
        summary.a += result.a;
        summary.b += result.b;
        if let Some(score) = result.bias.value() {
            summary.scored += 1;
            summary.scores.push(score);
        }
    }
    let mentions_a = by_outlet.values().map(|s| s.a.total).sum::<usize>();
    let mentions_b = by_outlet.values().map(|s| s.b.total).sum::<usize>();
    let mut summaries = by_outlet
        .into_values()
        .map(|mut summary| {
            summary.mean_bias = mean(&summary.scores);
            summary.mention_difference =
                share(summary.a.total, mentions_a) - share(summary.b.total, mentions_b);
            summary
        })
        .collect::<Vec<OutletSummary>>();
    summaries.sort_by(|x, y| {
        y.mention_difference
            .total_cmp(&x.mention_difference)
            .then_with(|| x.outlet.cmp(&y.outlet))
    });
    summaries
}

/// Defined scores of a result set; undefined scores are left out.
pub fn defined_scores(results: &[CorpusResult]) -> Vec<f64> {
    results.iter().filter_map(|r| r.bias.value()).collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}

/// Means of `rounds` resamples of `sample_size` values drawn with replacement.
pub fn bootstrap_means<R: Rng>(
    values: &[f64],
    sample_size: usize,
    rounds: usize,
    rng: &mut R,
) -> Vec<f64> {
    if values.is_empty() || sample_size == 0 {
        return Vec::new();
    }
    (0..rounds)
        .map(|_| {
            let total = (0..sample_size)
                .map(|_| values[rng.gen_range(0..values.len())])
                .sum::<f64>();
            total / sample_size as f64
        })
        .collect()
}

/// Percentile interval holding `level` of the bootstrapped means, e.g. 0.95.
pub fn confidence_interval(means: &[f64], level: f64) -> Option<(f64, f64)> {
    if means.is_empty() || !(level > 0.0 && level < 1.0) {
        return None;
    }
    let mut sorted = means.to_vec();
    sorted.sort_by(|x, y| x.total_cmp(y));
    let last = (sorted.len() - 1) as f64;
    let lower = ((1.0 - level) / 2.0 * last).round() as usize;
    let upper = ((1.0 + level) / 2.0 * last).round() as usize;
    Some((sorted[lower], sorted[upper]))
}
