//
// utils.rs
// plagscan
//
// File helpers: size parsing, binary sniffing, best-effort text decoding,
// content digests and collision-free output paths.
//
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;
use sha2::{Digest, Sha256};

pub fn parse_size(s: &str) -> u64 {
    let s = s.trim().to_lowercase();
    let units = [
        ("gib", 1024u64.pow(3)),
        ("mib", 1024u64.pow(2)),
        ("kib", 1024),
        ("kb", 1000),
        ("mb", 1000u64.pow(2)),
        ("gb", 1000u64.pow(3)),
        ("k", 1000),
        ("m", 1000u64.pow(2)),
        ("g", 1000u64.pow(3)),
        ("b", 1),
    ];

    for (unit, mult) in units {
        if let Some(num) = s.strip_suffix(unit) {
            if let Ok(val) = num.trim().parse::<f64>() {
                return (val * mult as f64) as u64;
            }
        }
    }
    s.parse().unwrap_or(0)
}

pub fn is_probably_binary(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return true,
    };
    let mut buffer = [0u8; 4096];
    let n = match file.read(&mut buffer) {
        Ok(n) => n,
        Err(_) => return true,
    };
    if n == 0 {
        return false;
    }

    let slice = &buffer[..n];
    if slice.contains(&0) {
        return true;
    }
    // legacy 8-bit text is decoded later; only control-byte heavy data is binary
    let control = slice
        .iter()
        .filter(|&&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c))
        .count();
    control * 10 > n
}

pub fn read_text_best_effort(path: &Path, normalize_eol: bool) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {path:?}"))?;
    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            let (res, _, _) = WINDOWS_1252.decode(err.as_bytes());
            res.into_owned()
        }
    };

    if normalize_eol {
        Ok(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Ok(content)
    }
}

/// Hex SHA-256 of a document's text, used to spot duplicate sources.
pub fn content_digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

pub fn avoid_collision(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or(Path::new("."));

    let mut n = 1;
    loop {
        let candidate = parent.join(format!("{stem} ({n}){ext}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_units() {
        assert_eq!(parse_size("5MB"), 5_000_000);
        assert_eq!(parse_size("2kib"), 2048);
        assert_eq!(parse_size("1.5k"), 1500);
        assert_eq!(parse_size(" 102400 "), 102400);
        assert_eq!(parse_size("10b"), 10);
        assert_eq!(parse_size("lots"), 0);
    }

    #[test]
    fn test_content_digest_is_stable() {
        assert_eq!(content_digest("abc"), content_digest("abc"));
        assert_ne!(content_digest("abc"), content_digest("abd"));
        assert_eq!(content_digest("").len(), 64);
    }

    #[test]
    fn test_binary_detection() {
        let dir = tempfile::TempDir::new().unwrap();
        let text = dir.path().join("a.txt");
        let nul = dir.path().join("b.bin");
        let control = dir.path().join("c.bin");
        std::fs::write(&text, "plain text\twith tabs\r\n").unwrap();
        std::fs::write(&nul, b"abc\0def").unwrap();
        std::fs::write(&control, [1u8, 2, 3, 4, b'a', b'b']).unwrap();

        assert!(!is_probably_binary(&text));
        assert!(is_probably_binary(&nul));
        assert!(is_probably_binary(&control));
        assert!(is_probably_binary(&dir.path().join("missing")));
    }
}
