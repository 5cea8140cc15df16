//
// detector.rs
// plagscan
//
// N-gram matching between a suspicious document and its sources, segment
// merging, and the multi-source detection run.
//
use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::DetectError;
use crate::near::{near_duplicates, NearMatch};
use crate::similarity::SimilarityMetric;
use crate::text::{ngrams, Token, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectConfig {
    pub ngram_size: usize,
    pub metric: SimilarityMetric,
    pub winnow_window: usize,
    /// Minimum word-diff ratio for a near-duplicate sentence.
    pub near_threshold: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            ngram_size: 4,
            metric: SimilarityMetric::Containment,
            winnow_window: 4,
            near_threshold: 0.8,
        }
    }
}

impl DetectConfig {
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.ngram_size == 0 {
            return Err(DetectError::InvalidNgramSize);
        }
        if self.winnow_window == 0 {
            return Err(DetectError::InvalidWindow);
        }
        if !(0.0..=1.0).contains(&self.near_threshold) {
            return Err(DetectError::InvalidThreshold(self.near_threshold));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub name: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// A span of the suspicious text that also occurs in one or more sources.
/// Offsets are byte offsets into the raw texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub suspicious_start: usize,
    pub suspicious_end: usize,
    pub source_start: usize,
    pub source_end: usize,
    pub sources: Vec<String>,
}

/// An n-gram match in token positions; `end_token` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgramMatch {
    pub text: String,
    pub start_token: usize,
    pub end_token: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub similarity: f64,
    pub segments: Vec<Segment>,
    pub near_matches: Vec<NearMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMatch {
    pub name: String,
    pub similarity: f64,
    pub segments_count: usize,
    pub near_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub max_similarity: f64,
    pub segments: Vec<Segment>,
    pub source_matches: Vec<SourceMatch>,
    pub near_matches: Vec<NearMatch>,
}

impl Detection {
    pub fn is_clean(&self) -> bool {
        self.segments.is_empty() && self.near_matches.is_empty()
    }

    /// True when the best source reaches `threshold`; drives `--fail-on-match`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.max_similarity >= threshold
    }
}

/// Every suspicious n-gram that occurs anywhere in the source, in suspicious order.
pub fn find_matching_ngrams<S: AsRef<str>>(
    suspicious_tokens: &[S],
    source_tokens: &[S],
    n: usize,
) -> Vec<NgramMatch> {
    let source_set: HashSet<Vec<&str>> = ngrams(source_tokens, n)
        .map(|g| g.iter().map(|t| t.as_ref()).collect())
        .collect();

    ngrams(suspicious_tokens, n)
        .enumerate()
        .filter_map(|(i, gram)| {
            let key: Vec<&str> = gram.iter().map(|t| t.as_ref()).collect();
            source_set.contains(&key).then(|| NgramMatch {
                text: key.join(" "),
                start_token: i,
                end_token: i + n - 1,
            })
        })
        .collect()
}

fn ngram_positions(tokens: &[Token], n: usize) -> HashMap<Vec<&str>, usize> {
    let mut first_seen = HashMap::new();
    for (i, gram) in tokens.windows(n).enumerate() {
        let key: Vec<&str> = gram.iter().map(|t| t.text.as_str()).collect();
        first_seen.entry(key).or_insert(i);
    }
    first_seen
}

/// Compare one suspicious text against one source.
pub fn compare(
    tokenizer: &Tokenizer,
    suspicious_raw: &str,
    source_raw: &str,
    cfg: &DetectConfig,
) -> Comparison {
    let n = cfg.ngram_size;
    let sus_tokens = tokenizer.tokenize(suspicious_raw);
    let src_tokens = tokenizer.tokenize(source_raw);

    let mut segments = Vec::new();
    if n > 0 && sus_tokens.len() >= n && src_tokens.len() >= n {
        let source_index = ngram_positions(&src_tokens, n);

        for (i, gram) in sus_tokens.windows(n).enumerate() {
            let key: Vec<&str> = gram.iter().map(|t| t.text.as_str()).collect();
            let Some(&src_idx) = source_index.get(&key) else {
                continue;
            };

            let start = sus_tokens[i].start;
            let end = sus_tokens[i + n - 1].end;
            segments.push(Segment {
                text: suspicious_raw[start..end].to_string(),
                suspicious_start: start,
                suspicious_end: end,
                source_start: src_tokens[src_idx].start,
                source_end: src_tokens[src_idx + n - 1].end,
                sources: Vec::new(),
            });
        }
    }

    let sus_words: Vec<&str> = sus_tokens.iter().map(|t| t.text.as_str()).collect();
    let src_words: Vec<&str> = src_tokens.iter().map(|t| t.text.as_str()).collect();
    let similarity = cfg.metric.score(&sus_words, &src_words, n, cfg.winnow_window);

    let near_matches = near_duplicates(tokenizer, suspicious_raw, source_raw, n, cfg.near_threshold);

    Comparison {
        similarity,
        segments,
        near_matches,
    }
}

/// Compare the suspicious text against every source and merge the results.
pub fn detect(
    tokenizer: &Tokenizer,
    suspicious_raw: &str,
    sources: &[SourceDocument],
    cfg: &DetectConfig,
) -> Result<Detection, DetectError> {
    cfg.validate()?;
    if sources.is_empty() {
        return Err(DetectError::NoSources);
    }

    let mut all_segments = Vec::new();
    let mut near_matches = Vec::new();
    let mut source_matches = Vec::new();
    let mut max_similarity: f64 = 0.0;

    for source in sources {
        let comparison = compare(tokenizer, suspicious_raw, &source.text, cfg);
        debug!(
            source = %source.name,
            similarity = comparison.similarity,
            segments = comparison.segments.len(),
            near = comparison.near_matches.len(),
            "Compared source"
        );

        if !comparison.segments.is_empty() || !comparison.near_matches.is_empty() {
            source_matches.push(SourceMatch {
                name: source.name.clone(),
                similarity: comparison.similarity,
                segments_count: comparison.segments.len(),
                near_count: comparison.near_matches.len(),
            });
        }
        max_similarity = max_similarity.max(comparison.similarity);

        all_segments.extend(comparison.segments.into_iter().map(|mut seg| {
            seg.sources = vec![source.name.clone()];
            seg
        }));
        near_matches.extend(comparison.near_matches.into_iter().map(|mut m| {
            m.source_name = source.name.clone();
            m
        }));
    }

    let segments = merge_overlapping_segments(all_segments, suspicious_raw);
    near_matches.sort_by_key(|m| m.suspicious_start);

    info!(
        sources = sources.len(),
        matched_sources = source_matches.len(),
        segments = segments.len(),
        max_similarity,
        "Detection finished"
    );

    Ok(Detection {
        max_similarity,
        segments,
        source_matches,
        near_matches,
    })
}

/// Fold overlapping or touching segments together. The merged text is
/// re-sliced from `suspicious_raw`; source names are unioned in first-seen order.
pub fn merge_overlapping_segments(mut segments: Vec<Segment>, suspicious_raw: &str) -> Vec<Segment> {
    segments.sort_by_key(|s| s.suspicious_start);

    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for current in segments {
        match merged.last_mut() {
            Some(previous) if current.suspicious_start <= previous.suspicious_end => {
                previous.suspicious_end = previous.suspicious_end.max(current.suspicious_end);
                for name in current.sources {
                    if !previous.sources.contains(&name) {
                        previous.sources.push(name);
                    }
                }
            }
            _ => merged.push(current),
        }
    }

    for seg in &mut merged {
        if let Some(text) = suspicious_raw.get(seg.suspicious_start..seg.suspicious_end) {
            seg.text = text.to_string();
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: usize, end: usize, source: &str, source_start: usize) -> Segment {
        Segment {
            text: String::new(),
            suspicious_start: start,
            suspicious_end: end,
            source_start,
            source_end: source_start + (end - start),
            sources: vec![source.to_string()],
        }
    }

    fn cfg(n: usize) -> DetectConfig {
        DetectConfig {
            ngram_size: n,
            ..DetectConfig::default()
        }
    }

    #[test]
    fn test_find_matching_ngrams() {
        let sus = ["a", "b", "c", "d", "e"];
        let src = ["x", "b", "c", "d", "y"];
        let matches = find_matching_ngrams(&sus, &src, 3);
        assert_eq!(
            matches,
            vec![NgramMatch {
                text: "b c d".to_string(),
                start_token: 1,
                end_token: 3,
            }]
        );
    }

    #[test]
    fn test_compare_maps_segments_to_raw_offsets() {
        let tokenizer = Tokenizer::without_stop_words();
        let suspicious = "Intro. Alpha, Beta gamma delta! Outro";
        let source = "zzz alpha beta gamma delta";

        let result = compare(&tokenizer, suspicious, source, &cfg(4));
        assert_eq!(result.segments.len(), 1);
        let s = &result.segments[0];
        assert_eq!(s.text, "Alpha, Beta gamma delta");
        assert_eq!(&suspicious[s.suspicious_start..s.suspicious_end], s.text);
        assert_eq!(&source[s.source_start..s.source_end], "alpha beta gamma delta");
        // suspicious 4-grams: 3, shared: 1
        assert!((result.similarity - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_source_offsets_use_first_occurrence() {
        let tokenizer = Tokenizer::without_stop_words();
        let result = compare(&tokenizer, "one two", "one two and one two", &cfg(2));
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].source_start, 0);
        assert_eq!(result.segments[0].source_end, 7);
    }

    #[test]
    fn test_compare_too_few_tokens() {
        let tokenizer = Tokenizer::without_stop_words();
        let result = compare(&tokenizer, "short text", "short text", &cfg(4));
        assert!(result.segments.is_empty());
        assert_eq!(result.similarity, 0.0);
    }

    #[test]
    fn test_merge_overlapping_and_touching() {
        let raw = "0123456789abcdefghij";
        let merged = merge_overlapping_segments(
            vec![
                seg(12, 15, "B", 40),
                seg(0, 4, "A", 100),
                seg(3, 8, "B", 20),
                seg(8, 10, "A", 60),
            ],
            raw,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!((merged[0].suspicious_start, merged[0].suspicious_end), (0, 10));
        assert_eq!(merged[0].text, "0123456789");
        assert_eq!(merged[0].sources, vec!["A".to_string(), "B".to_string()]);
        // the earliest segment's source range survives the merge
        assert_eq!((merged[0].source_start, merged[0].source_end), (100, 104));
        assert_eq!(merged[1].text, "cde");
        assert_eq!((merged[1].source_start, merged[1].source_end), (40, 43));
    }

    #[test]
    fn test_merge_contained_segment_keeps_outer_end() {
        let merged = merge_overlapping_segments(vec![seg(0, 10, "A", 7), seg(2, 5, "A", 0)], "abcdefghijkl");
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].suspicious_end, 10);
        assert_eq!((merged[0].source_start, merged[0].source_end), (7, 17));
        assert_eq!(merged[0].sources, vec!["A".to_string()]);
    }

    #[test]
    fn test_exceeds_threshold() {
        let detection = Detection {
            max_similarity: 0.8,
            segments: Vec::new(),
            source_matches: Vec::new(),
            near_matches: Vec::new(),
        };
        assert!(detection.exceeds(0.8));
        assert!(detection.exceeds(0.5));
        assert!(!detection.exceeds(0.81));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_overlapping_segments(Vec::new(), "").is_empty());
    }

    #[test]
    fn test_detect_rejects_bad_config() {
        let tokenizer = Tokenizer::without_stop_words();
        let sources = vec![SourceDocument::new("s", "text")];
        assert!(matches!(
            detect(&tokenizer, "text", &sources, &cfg(0)),
            Err(DetectError::InvalidNgramSize)
        ));
        assert!(matches!(
            detect(&tokenizer, "text", &[], &cfg(3)),
            Err(DetectError::NoSources)
        ));
        let bad_threshold = DetectConfig {
            near_threshold: 1.5,
            ..DetectConfig::default()
        };
        assert!(matches!(
            detect(&tokenizer, "text", &sources, &bad_threshold),
            Err(DetectError::InvalidThreshold(_))
        ));
    }
}
