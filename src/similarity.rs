//
// similarity.rs
// plagscan
//
// Similarity metrics between the n-gram sets of two token streams.
//
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DetectError;
use crate::fingerprint::Fingerprint;
use crate::text::ngrams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Share of the suspicious document's n-grams found in the source.
    #[default]
    Containment,
    Jaccard,
    Cosine,
    /// Containment over winnowed rolling-hash fingerprints.
    Winnowing,
}

impl SimilarityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::Containment => "containment",
            SimilarityMetric::Jaccard => "jaccard",
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Winnowing => "winnowing",
        }
    }

    /// Score `suspicious` against `source`. `window` is only used by winnowing.
    pub fn score<S: AsRef<str>>(&self, suspicious: &[S], source: &[S], n: usize, window: usize) -> f64 {
        match self {
            SimilarityMetric::Containment => containment(suspicious, source, n),
            SimilarityMetric::Jaccard => jaccard(suspicious, source, n),
            SimilarityMetric::Cosine => cosine(suspicious, source, n),
            SimilarityMetric::Winnowing => {
                Fingerprint::of(suspicious, n, window).containment(&Fingerprint::of(source, n, window))
            }
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMetric {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "containment" => Ok(SimilarityMetric::Containment),
            "jaccard" => Ok(SimilarityMetric::Jaccard),
            "cosine" => Ok(SimilarityMetric::Cosine),
            "winnowing" => Ok(SimilarityMetric::Winnowing),
            other => Err(DetectError::UnknownMetric(other.to_string())),
        }
    }
}

fn ngram_set<S: AsRef<str>>(tokens: &[S], n: usize) -> HashSet<Vec<&str>> {
    ngrams(tokens, n)
        .map(|g| g.iter().map(|t| t.as_ref()).collect())
        .collect()
}

fn ngram_counts<S: AsRef<str>>(tokens: &[S], n: usize) -> HashMap<Vec<&str>, usize> {
    let mut counts = HashMap::new();
    for gram in ngrams(tokens, n) {
        let key: Vec<&str> = gram.iter().map(|t| t.as_ref()).collect();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

pub fn containment<S: AsRef<str>>(suspicious: &[S], source: &[S], n: usize) -> f64 {
    let sus = ngram_set(suspicious, n);
    if sus.is_empty() {
        return 0.0;
    }
    let src = ngram_set(source, n);
    sus.intersection(&src).count() as f64 / sus.len() as f64
}

pub fn jaccard<S: AsRef<str>>(suspicious: &[S], source: &[S], n: usize) -> f64 {
    let sus = ngram_set(suspicious, n);
    let src = ngram_set(source, n);
    let union = sus.union(&src).count();
    if union == 0 {
        return 0.0;
    }
    sus.intersection(&src).count() as f64 / union as f64
}

pub fn cosine<S: AsRef<str>>(suspicious: &[S], source: &[S], n: usize) -> f64 {
    let a = ngram_counts(suspicious, n);
    let b = ngram_counts(source, n);

    let dot: f64 = a
        .iter()
        .filter_map(|(gram, &ca)| b.get(gram).map(|&cb| (ca * cb) as f64))
        .sum();
    let norm = |m: &HashMap<Vec<&str>, usize>| m.values().map(|&c| (c * c) as f64).sum::<f64>().sqrt();
    let denom = norm(&a) * norm(&b);

    if denom == 0.0 {
        0.0
    } else {
        (dot / denom).min(1.0)
    }
}
