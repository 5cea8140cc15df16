//
// cli.rs
// plagscan
//
// Command-line arguments and the validated options built from them.
//
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glob::Pattern;

use crate::detector::DetectConfig;
use crate::similarity::SimilarityMetric;
use crate::utils::parse_size;

#[derive(Parser, Debug)]
#[command(name = "plagscan", author, version, about, long_about = None)]
pub struct Args {
    /// Suspicious (assignment) document to check
    #[arg(short, long, required_unless_present = "demo")]
    pub suspicious: Option<PathBuf>,

    /// Source documents or directories of sources to compare against
    #[arg(short = 'r', long, num_args = 1.., required_unless_present = "demo")]
    pub sources: Vec<PathBuf>,

    /// N-gram size in words
    #[arg(short, long, env = "PLAGSCAN_NGRAM", default_value_t = 4)]
    pub ngram: usize,

    /// Similarity metric: containment, jaccard, cosine or winnowing
    #[arg(short, long, env = "PLAGSCAN_METRIC", default_value = "containment")]
    pub metric: String,

    /// Window size for winnowing fingerprints
    #[arg(short, long, default_value_t = 4)]
    pub window: usize,

    /// Near-duplicate sentence ratio; also the similarity at which a source is flagged
    #[arg(short, long, default_value_t = 0.8)]
    pub threshold: f64,

    /// Keep stop words instead of removing them before comparison
    #[arg(long)]
    pub keep_stop_words: bool,

    /// Glob patterns to ignore when walking source directories (can be repeated or comma separated)
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    pub ignore: Vec<String>,

    /// Normalize EOL (CRLF/LF) before comparison
    #[arg(short = 'E', long)]
    pub normalize_eol: bool,

    /// Max size of a source file (e.g., 5MB, 102400)
    #[arg(short = 'S', long, default_value = "5MB")]
    pub max_text_size: String,

    /// HTML report path (defaults to <suspicious>_plagiarism_report.html)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a JSON report to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Do not write the HTML report
    #[arg(long)]
    pub no_report: bool,

    /// Only list the sources that would be compared
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 2 when the overall similarity reaches the threshold
    #[arg(long)]
    pub fail_on_match: bool,

    /// Run the built-in sample documents; writes single_source_report.html and
    /// multi_source_report.html (--output replaces the latter)
    #[arg(long)]
    pub demo: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug)]
pub struct Options {
    pub detect: DetectConfig,
    pub keep_stop_words: bool,
    pub normalize_eol: bool,
    pub max_text_size: u64,
    pub ignore_patterns: Vec<Pattern>,
    pub dry_run: bool,
    pub fail_on_match: bool,
}

pub fn build_options(args: &Args) -> Result<Options> {
    let patterns = args
        .ignore
        .iter()
        .map(|s| Pattern::new(s).with_context(|| format!("Invalid glob pattern: {s}")))
        .collect::<Result<Vec<_>>>()?;

    let metric: SimilarityMetric = args.metric.parse()?;
    let detect = DetectConfig {
        ngram_size: args.ngram,
        metric,
        winnow_window: args.window,
        near_threshold: args.threshold,
    };
    detect.validate().context("Invalid detection settings")?;

    Ok(Options {
        detect,
        keep_stop_words: args.keep_stop_words,
        normalize_eol: args.normalize_eol,
        max_text_size: parse_size(&args.max_text_size),
        ignore_patterns: patterns,
        dry_run: args.dry_run,
        fail_on_match: args.fail_on_match,
    })
}
