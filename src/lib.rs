//
// lib.rs
// plagscan
//
// Library entry that re-exports modules so the binary and the integration tests share
// tokenization, matching, scanning and reporting.
//
pub mod cli;
pub mod demo;
pub mod detector;
pub mod error;
pub mod fingerprint;
pub mod near;
pub mod report;
pub mod scanner;
pub mod similarity;
pub mod terminal;
pub mod text;
pub mod utils;

pub use cli::{build_options, Args, Options};
pub use detector::{compare, detect, DetectConfig, Detection, Segment, SourceDocument, SourceMatch};
pub use error::{DetectError, ReportError};
pub use scanner::{load_sources, scan_sources, ScanResult, SkipReason, SourceFile};
pub use similarity::SimilarityMetric;
pub use text::{Token, Tokenizer};
