//
// scanner.rs
// plagscan
//
// Expands source arguments into readable text files and loads them as
// source documents, dropping duplicates and the suspicious file itself.
//
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::detector::SourceDocument;
use crate::utils::{content_digest, is_probably_binary, read_text_best_effort};

/// A source file found on disk, with the display name used in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Missing,
    Unreadable(io::ErrorKind),
    Binary,
    TooLarge(u64),
}

impl SkipReason {
    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SkipReason::Missing,
            kind => SkipReason::Unreadable(kind),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "not found"),
            SkipReason::Unreadable(kind) => write!(f, "unreadable ({kind})"),
            SkipReason::Binary => write!(f, "binary file"),
            SkipReason::TooLarge(size) => write!(f, "too large ({size} bytes)"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<SourceFile>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

fn is_ignored(rel: &Path, patterns: &[Pattern]) -> bool {
    let name = rel.file_name().and_then(|s| s.to_str()).unwrap_or("");
    if [".git", "__pycache__", ".DS_Store", "Thumbs.db"].contains(&name) {
        return true;
    }
    let s_rel = rel.to_string_lossy().replace('\\', "/");
    for pat in patterns {
        if pat.matches(&s_rel) || pat.matches(name) {
            return true;
        }
    }
    false
}

fn unique_name(name: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{name} ({n})");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

struct Collector<'a> {
    max_size: u64,
    taken: HashSet<String>,
    result: &'a mut ScanResult,
}

impl Collector<'_> {
    fn offer(&mut self, name: String, path: &Path) {
        let size = match path.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!(?path, error = %err, "Cannot stat source");
                self.result
                    .skipped
                    .push((path.to_path_buf(), SkipReason::from_io(&err)));
                return;
            }
        };
        if size > self.max_size {
            debug!(?path, size, "Skipping oversized source");
            self.result
                .skipped
                .push((path.to_path_buf(), SkipReason::TooLarge(size)));
            return;
        }
        if is_probably_binary(path) {
            debug!(?path, "Skipping binary source");
            self.result.skipped.push((path.to_path_buf(), SkipReason::Binary));
            return;
        }

        let name = unique_name(name, &mut self.taken);
        self.result.files.push(SourceFile {
            name,
            path: path.to_path_buf(),
        });
    }
}

/// Expand source arguments into text files. Files keep their file name;
/// directories are walked and their files are named by relative path.
pub fn scan_sources(paths: &[PathBuf], patterns: &[Pattern], max_size: u64) -> ScanResult {
    let mut result = ScanResult::default();
    let mut collector = Collector {
        max_size,
        taken: HashSet::new(),
        result: &mut result,
    };

    for root in paths {
        if root.is_file() {
            let name = root
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| root.to_string_lossy().into_owned());
            collector.offer(name, root);
        } else if root.is_dir() {
            scan_dir(root, patterns, &mut collector);
        } else {
            warn!(path = ?root, "Source path does not exist");
            collector.result.skipped.push((root.clone(), SkipReason::Missing));
        }
    }

    result
}

/// Read scanned files into source documents. Files whose text matches an
/// earlier source are dropped, as is `suspicious` when it was picked up from a
/// source directory. Unreadable files are logged and skipped.
pub fn load_sources(
    scan: ScanResult,
    suspicious: Option<&Path>,
    normalize_eol: bool,
) -> Vec<SourceDocument> {
    for (path, reason) in &scan.skipped {
        warn!(?path, %reason, "Skipping source");
    }
    let suspicious = suspicious.and_then(|p| p.canonicalize().ok());

    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for file in scan.files {
        if suspicious.is_some() && file.path.canonicalize().ok() == suspicious {
            info!(path = ?file.path, "Skipping the suspicious document itself");
            continue;
        }
        let text = match read_text_best_effort(&file.path, normalize_eol) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = ?file.path, error = %err, "Error reading source file");
                continue;
            }
        };
        if !seen.insert(content_digest(&text)) {
            warn!(name = %file.name, "Source duplicates an earlier source; skipping");
            continue;
        }
        sources.push(SourceDocument::new(file.name, text));
    }
    sources
}

fn scan_dir(root: &Path, patterns: &[Pattern], collector: &mut Collector<'_>) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_entry(|e| {
        let path = e.path();
        if let Ok(rel) = path.strip_prefix(root) {
            if rel == Path::new("") {
                return true;
            }
            !is_ignored(rel, patterns)
        } else {
            true
        }
    }) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "Failed to read directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if let Ok(rel) = path.strip_prefix(root) {
            let name = rel.to_string_lossy().replace('\\', "/");
            collector.offer(name, path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ignored_defaults_and_globs() {
        let patterns = vec![Pattern::new("*.log").unwrap(), Pattern::new("drafts/*").unwrap()];
        assert!(is_ignored(Path::new(".git"), &patterns));
        assert!(is_ignored(Path::new("a/b/run.log"), &patterns));
        assert!(is_ignored(Path::new("drafts/old.txt"), &patterns));
        assert!(!is_ignored(Path::new("essays/final.txt"), &patterns));
    }

    #[test]
    fn test_unique_name_suffixes() {
        let mut taken = HashSet::new();
        assert_eq!(unique_name("a.txt".into(), &mut taken), "a.txt");
        assert_eq!(unique_name("a.txt".into(), &mut taken), "a.txt (1)");
        assert_eq!(unique_name("a.txt".into(), &mut taken), "a.txt (2)");
    }

    #[test]
    fn test_skip_reason_from_io_error() {
        let missing = io::Error::from(io::ErrorKind::NotFound);
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(SkipReason::from_io(&missing), SkipReason::Missing);
        assert_eq!(
            SkipReason::from_io(&denied),
            SkipReason::Unreadable(io::ErrorKind::PermissionDenied)
        );
        assert_eq!(SkipReason::Missing.to_string(), "not found");
        assert!(SkipReason::from_io(&denied)
            .to_string()
            .starts_with("unreadable ("));
    }
}
