//
// terminal.rs
// plagscan
//
// Colored terminal output for detection results.
//
use std::path::Path;

use colored::{ColoredString, Colorize};

use crate::detector::Detection;
use crate::report::format_percent;

fn colorize_similarity(similarity: f64, threshold: f64) -> ColoredString {
    let text = format_percent(similarity);
    if similarity >= threshold {
        text.red().bold()
    } else if similarity > 0.0 {
        text.yellow()
    } else {
        text.green()
    }
}

/// Print the summary of a detection run.
pub fn display_detection(detection: &Detection, threshold: f64) {
    println!(
        "Overall Plagiarism Similarity: {}",
        colorize_similarity(detection.max_similarity, threshold)
    );

    if detection.is_clean() {
        println!("{}", "No direct plagiarism detected.".green());
        return;
    }

    if !detection.segments.is_empty() {
        println!(
            "\n{}",
            format!("=== Found {} plagiarized segments ===", detection.segments.len()).bold()
        );
        for segment in &detection.segments {
            println!(
                "  - Matched Text: '{}' {}",
                segment.text.replace('\n', " "),
                format!("(Source: {})", segment.sources.join(", ")).dimmed()
            );
        }
    }

    if !detection.source_matches.is_empty() {
        println!("\n{}", "=== Source Matches ===".bold());
        println!(
            "  {:<40} {:>10}  {:>8}  {:>5}",
            "Source".dimmed(),
            "Similarity".dimmed(),
            "Segments".dimmed(),
            "Near".dimmed()
        );
        for m in &detection.source_matches {
            let flag = if m.similarity >= threshold {
                " !!".red().bold().to_string()
            } else {
                String::new()
            };
            println!(
                "  {:<40} {:>10}  {:>8}  {:>5}{flag}",
                m.name,
                colorize_similarity(m.similarity, threshold),
                m.segments_count,
                m.near_count
            );
        }
    }

    if !detection.near_matches.is_empty() {
        println!("\n{}", "=== Near-duplicate Sentences ===".bold());
        for m in &detection.near_matches {
            println!(
                "  ~ '{}'\n    {} {}",
                m.suspicious_text.replace('\n', " "),
                format!("{} ({}):", m.source_name, format_percent(m.ratio)).dimmed(),
                m.source_text.replace('\n', " ")
            );
        }
    }
}

pub fn display_report_path(path: &Path) {
    println!("\nHTML report created: {}", path.display().to_string().cyan());
}
