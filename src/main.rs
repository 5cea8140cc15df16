//
// main.rs
// plagscan
//
// Binary entry: parses arguments, loads the documents, runs detection and
// writes the reports.
//
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plagscan::report::{format_percent, write_html, write_json, Report};
use plagscan::utils::{avoid_collision, read_text_best_effort};
use plagscan::{build_options, demo, detect, load_sources, scan_sources, terminal};
use plagscan::{Args, Detection, Options, Tokenizer};

fn init_logging(verbose: bool) {
    let default = if verbose { "plagscan=debug" } else { "plagscan=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn default_report_path(suspicious: &Path) -> PathBuf {
    let stem = suspicious
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    avoid_collision(Path::new(&format!("{stem}_plagiarism_report.html")))
}

/// HTML (unless `--no-report`) and JSON outputs, then the exit status.
fn finish(
    args: &Args,
    opts: &Options,
    suspicious: &str,
    detection: &Detection,
    html_path: impl FnOnce() -> PathBuf,
) -> Result<ExitCode> {
    if !args.no_report {
        let path = args.output.clone().unwrap_or_else(html_path);
        write_html(&path, suspicious, detection)?;
        terminal::display_report_path(&path);
    }
    if let Some(json_path) = &args.json {
        let report = Report::new(suspicious, opts.detect.ngram_size, opts.detect.metric, detection);
        write_json(json_path, &report)?;
        println!("JSON report created: {}", json_path.display());
    }

    if opts.fail_on_match && detection.exceeds(opts.detect.near_threshold) {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_demo(tokenizer: &Tokenizer, args: &Args, opts: &Options) -> Result<ExitCode> {
    println!("{}", "Running sample test case...".bold());
    let sources = demo::sources();

    println!("\n--- Testing with a single source document ---");
    let single = detect(tokenizer, demo::SUSPICIOUS, &sources[..1], &opts.detect)?;
    println!("Overall Plagiarism Similarity: {}", format_percent(single.max_similarity));
    for segment in &single.segments {
        println!(
            "  - Matched Text: '{}' (Bytes: {}-{})",
            segment.text, segment.suspicious_start, segment.suspicious_end
        );
    }
    if !args.no_report {
        let path = avoid_collision(Path::new("single_source_report.html"));
        write_html(&path, demo::SUSPICIOUS, &single)?;
        terminal::display_report_path(&path);
    }

    println!("\n--- Testing with multiple source documents ---");
    let detection = detect(tokenizer, demo::SUSPICIOUS, &sources, &opts.detect)?;
    terminal::display_detection(&detection, opts.detect.near_threshold);

    finish(args, opts, demo::SUSPICIOUS, &detection, || {
        avoid_collision(Path::new("multi_source_report.html"))
    })
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);
    let opts = build_options(&args)?;

    let tokenizer = if opts.keep_stop_words {
        Tokenizer::without_stop_words()
    } else {
        Tokenizer::english()
    };

    if args.demo {
        return run_demo(&tokenizer, &args, &opts);
    }

    let suspicious_path = args
        .suspicious
        .as_deref()
        .context("--suspicious is required")?
        .canonicalize()
        .context("Invalid suspicious document path")?;
    let suspicious = read_text_best_effort(&suspicious_path, opts.normalize_eol)?;

    let scan = scan_sources(&args.sources, &opts.ignore_patterns, opts.max_text_size);
    let sources = load_sources(scan, Some(&suspicious_path), opts.normalize_eol);

    if opts.dry_run {
        println!("== DRY RUN ==");
        println!("Suspicious document: {:?}", suspicious_path);
        println!("Sources that would be compared: {}", sources.len());
        for source in &sources {
            println!("  - {}", source.name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if sources.is_empty() {
        anyhow::bail!("No valid source documents provided.");
    }
    info!(sources = sources.len(), ngram = opts.detect.ngram_size, metric = %opts.detect.metric, "Comparing");

    let detection = detect(&tokenizer, &suspicious, &sources, &opts.detect)?;
    terminal::display_detection(&detection, opts.detect.near_threshold);

    finish(&args, &opts, &suspicious, &detection, || default_report_path(&suspicious_path))
}
