//
// near.rs
// plagscan
//
// Near-duplicate sentence detection.
//
// Exact n-gram matching misses sentences that were lightly edited (a word
// swapped, an adjective dropped). Here every sentence is reduced to its
// normalized words and compared with a word-level diff; pairs whose ratio
// reaches the threshold are reported.
//
use serde::Serialize;
use similar::TextDiff;

use crate::text::Tokenizer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearMatch {
    pub suspicious_text: String,
    pub suspicious_start: usize,
    pub suspicious_end: usize,
    pub source_text: String,
    pub source_start: usize,
    pub source_end: usize,
    pub ratio: f64,
    pub source_name: String,
}

/// Split on `.`, `!` or `?` followed by whitespace (or end of input), and on
/// blank lines. Ranges are trimmed; empty sentences are dropped.
pub fn split_sentences(raw: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = raw.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let boundary = match ch {
            '.' | '!' | '?' => chars.peek().map_or(true, |&(_, next)| next.is_whitespace()),
            '\n' => {
                let rest = &raw[idx + 1..];
                let line_end = rest.find('\n');
                matches!(line_end, Some(pos) if rest[..pos].trim().is_empty())
            }
            _ => false,
        };
        if boundary {
            let end = idx + ch.len_utf8();
            push_trimmed(raw, start, end, &mut sentences);
            start = end;
        }
    }
    push_trimmed(raw, start, raw.len(), &mut sentences);
    sentences
}

fn push_trimmed(raw: &str, start: usize, end: usize, out: &mut Vec<Sentence>) {
    let slice = &raw[start..end];
    let lead = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let s = start + lead;
    out.push(Sentence {
        text: trimmed.to_string(),
        start: s,
        end: s + trimmed.len(),
    });
}

struct Normalized {
    sentence: Sentence,
    words: String,
}

fn normalize(tokenizer: &Tokenizer, raw: &str, min_tokens: usize) -> Vec<Normalized> {
    split_sentences(raw)
        .into_iter()
        .filter_map(|sentence| {
            let words = tokenizer.words(&sentence.text);
            if words.is_empty() || words.len() < min_tokens {
                return None;
            }
            Some(Normalized {
                sentence,
                words: words.join(" "),
            })
        })
        .collect()
}

/// Best-matching source sentence for every suspicious sentence whose
/// word-diff ratio is at least `threshold`. `source_name` is left empty.
pub fn near_duplicates(
    tokenizer: &Tokenizer,
    suspicious_raw: &str,
    source_raw: &str,
    min_tokens: usize,
    threshold: f64,
) -> Vec<NearMatch> {
    let suspicious = normalize(tokenizer, suspicious_raw, min_tokens);
    let source = normalize(tokenizer, source_raw, min_tokens);
    if suspicious.is_empty() || source.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for sus in &suspicious {
        let mut best: Option<(f64, &Normalized)> = None;
        for src in &source {
            let ratio = TextDiff::from_words(sus.words.as_str(), src.words.as_str()).ratio() as f64;
            if best.map_or(true, |(r, _)| ratio > r) {
                best = Some((ratio, src));
            }
        }

        if let Some((ratio, src)) = best {
            if ratio >= threshold {
                matches.push(NearMatch {
                    suspicious_text: sus.sentence.text.clone(),
                    suspicious_start: sus.sentence.start,
                    suspicious_end: sus.sentence.end,
                    source_text: src.sentence.text.clone(),
                    source_start: src.sentence.start,
                    source_end: src.sentence.end,
                    ratio,
                    source_name: String::new(),
                });
            }
        }
    }
    matches
}
