//
// demo.rs
// plagscan
//
// Built-in sample documents for `plagscan --demo`.
//
use crate::detector::SourceDocument;

pub const SUSPICIOUS: &str = "\
The quick brown fox jumps over the lazy dog. This is an example of a sentence that might be plagiarized.
Natural language processing is a field of artificial intelligence that focuses on the interaction between computers and human language.
Machine learning algorithms can be trained to recognize patterns in text and identify similarities between documents.
";

pub const SOURCE_ONE: &str = "\
Natural language processing is a field of artificial intelligence that focuses on the interaction between computers and human language.
The quick brown fox jumps over the lazy cat. This is an original sentence.
";

pub const SOURCE_TWO: &str = "\
Machine learning algorithms can be trained to recognize patterns in text and identify similarities between documents.
This is completely original content that should not match anything in the suspicious document.
";

pub fn sources() -> Vec<SourceDocument> {
    vec![
        SourceDocument::new("Source 1", SOURCE_ONE),
        SourceDocument::new("Source 2", SOURCE_TWO),
    ]
}
