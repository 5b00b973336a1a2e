//! Completion metrics over a single predicted line.
//!
//! Both texts are preprocessed the same way before scoring: `\r` removed,
//! leading newlines stripped, only the first line kept, then optionally
//! trimmed and lowercased. Scores lie in `[0, 1]`.
//!
//! - [`Lcp`]: common-prefix length over the prediction length, i.e. the share
//!   of the suggestion a user could accept as is.
//! - [`RougeLcp`]: common-prefix length over the reference length.

use crate::error::{CorpusError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricOptions {
    /// Trim surrounding whitespace.
    pub normalize: bool,
    pub case_sensitive: bool,
}

impl Default for MetricOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            case_sensitive: true,
        }
    }
}

pub fn preprocess(text: &str, opts: MetricOptions) -> String {
    let no_cr: String = text.chars().filter(|&c| c != '\r').collect();
    let first = no_cr
        .trim_start_matches('\n')
        .split('\n')
        .next()
        .unwrap_or_default();
    let line = if opts.normalize { first.trim() } else { first };
    if opts.case_sensitive {
        line.to_string()
    } else {
        line.to_lowercase()
    }
}

/// Length in characters of the longest common prefix.
pub fn lcp_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

pub trait CompletionMetric {
    fn name(&self) -> &'static str;

    fn options(&self) -> MetricOptions;

    /// Score already-preprocessed texts.
    fn score_processed(&self, prediction: &str, reference: &str) -> f64;

    fn score(&self, prediction: &str, reference: &str) -> f64 {
        let opts = self.options();
        self.score_processed(&preprocess(prediction, opts), &preprocess(reference, opts))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lcp {
    pub options: MetricOptions,
}

impl CompletionMetric for Lcp {
    fn name(&self) -> &'static str {
        "lcp"
    }

    fn options(&self) -> MetricOptions {
        self.options
    }

    fn score_processed(&self, prediction: &str, reference: &str) -> f64 {
        let len = prediction.chars().count();
        if len == 0 {
            return 0.0;
        }
        lcp_len(prediction, reference) as f64 / len as f64
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RougeLcp {
    pub options: MetricOptions,
}

impl CompletionMetric for RougeLcp {
    fn name(&self) -> &'static str {
        "rouge_lcp"
    }

    fn options(&self) -> MetricOptions {
        self.options
    }

    fn score_processed(&self, prediction: &str, reference: &str) -> f64 {
        let len = reference.chars().count();
        if len == 0 {
            return 0.0;
        }
        lcp_len(prediction, reference) as f64 / len as f64
    }
}

/// Aggregate over a batch of (prediction, reference) pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchScore {
    pub metric: String,
    pub scores: Vec<f64>,
    pub mean: f64,
    pub exact_matches: usize,
    pub exact_match_rate: f64,
}

pub fn evaluate_batch(
    metric: &dyn CompletionMetric,
    predictions: &[String],
    references: &[String],
) -> Result<BatchScore> {
    if predictions.len() != references.len() {
        return Err(CorpusError::InvalidConfig(format!(
            "{} predictions for {} references",
            predictions.len(),
            references.len()
        )));
    }

    let opts = metric.options();
    let mut scores = Vec::with_capacity(predictions.len());
    let mut exact_matches = 0;
    for (p, r) in predictions.iter().zip(references) {
        let (p, r) = (preprocess(p, opts), preprocess(r, opts));
        if p == r {
            exact_matches += 1;
        }
        scores.push(metric.score_processed(&p, &r));
    }

    let n = scores.len();
    let (mean, exact_match_rate) = if n == 0 {
        (0.0, 0.0)
    } else {
        (
            scores.iter().sum::<f64>() / n as f64,
            exact_matches as f64 / n as f64,
        )
    };

    Ok(BatchScore {
        metric: metric.name().to_string(),
        scores,
        mean,
        exact_matches,
        exact_match_rate,
    })
}
