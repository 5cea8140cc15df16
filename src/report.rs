//
// report.rs
// plagscan
//
// HTML and JSON reports.
//
// The HTML report shows the suspicious document with every merged segment
// highlighted, followed by a per-source summary and any near-duplicate
// sentences. All document text is escaped before it is placed in markup.
//
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::detector::{Detection, Segment, SourceMatch};
use crate::error::ReportError;
use crate::near::NearMatch;
use crate::similarity::SimilarityMetric;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
.document { white-space: pre-wrap; border: 1px solid #ccc; padding: 10px; }
.highlight { background-color: yellow; }
.near { margin-bottom: 10px; padding: 5px; border: 1px solid #ccc; }
.source-info { font-size: 0.9em; color: #555; }";

/// Serializable summary of one detection run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub suspicious: &'a str,
    pub ngram_size: usize,
    pub metric: SimilarityMetric,
    pub max_similarity: f64,
    pub sources: &'a [SourceMatch],
    pub segments: &'a [Segment],
    pub near_matches: &'a [NearMatch],
}

impl<'a> Report<'a> {
    pub fn new(suspicious: &'a str, ngram_size: usize, metric: SimilarityMetric, detection: &'a Detection) -> Self {
        Self {
            suspicious,
            ngram_size,
            metric,
            max_similarity: detection.max_similarity,
            sources: &detection.source_matches,
            segments: &detection.segments,
            near_matches: &detection.near_matches,
        }
    }
}

pub fn format_percent(x: f64) -> String {
    format!("{:.2}%", x * 100.0)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn highlight(suspicious: &str, segments: &[Segment]) -> String {
    let mut sorted: Vec<&Segment> = segments.iter().collect();
    sorted.sort_by_key(|s| s.suspicious_start);

    let mut out = String::new();
    let mut last = 0;
    for seg in sorted {
        let (Some(before), Some(matched)) = (
            suspicious.get(last..seg.suspicious_start),
            suspicious.get(seg.suspicious_start..seg.suspicious_end),
        ) else {
            continue;
        };
        out.push_str(&escape_html(before));
        let _ = write!(
            out,
            "<span class=\"highlight\" title=\"{}\">{}</span>",
            escape_html(&seg.sources.join(", ")),
            escape_html(matched)
        );
        last = seg.suspicious_end;
    }
    out.push_str(&escape_html(suspicious.get(last..).unwrap_or("")));
    out
}

pub fn render_html(suspicious: &str, detection: &Detection) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Plagiarism Report</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n<h1>Plagiarism Detection Report</h1>\n"
    );
    let _ = writeln!(
        html,
        "<p class=\"source-info\">Overall similarity: {}</p>",
        format_percent(detection.max_similarity)
    );
    let _ = writeln!(
        html,
        "<div class=\"document\">{}</div>",
        highlight(suspicious, &detection.segments)
    );

    if !detection.source_matches.is_empty() {
        html.push_str("<h2>Source Matches</h2>\n<ul>\n");
        for m in &detection.source_matches {
            let _ = writeln!(
                html,
                "<li>{}: Similarity {}, Segments {}</li>",
                escape_html(&m.name),
                format_percent(m.similarity),
                m.segments_count
            );
        }
        html.push_str("</ul>\n");
    }

    if !detection.near_matches.is_empty() {
        html.push_str("<h2>Near-duplicate Sentences</h2>\n");
        for m in &detection.near_matches {
            let _ = writeln!(
                html,
                "<div class=\"near\"><p>{}</p><p class=\"source-info\">{} ({}): {}</p></div>",
                escape_html(&m.suspicious_text),
                escape_html(&m.source_name),
                format_percent(m.ratio),
                escape_html(&m.source_text)
            );
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_html(path: &Path, suspicious: &str, detection: &Detection) -> Result<(), ReportError> {
    write_file(path, &render_html(suspicious, detection))
}

pub fn write_json(path: &Path, report: &Report<'_>) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report)?;
    write_file(path, &json)
}
