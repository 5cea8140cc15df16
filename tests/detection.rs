use plagscan::demo;
use plagscan::detector::{compare, detect, DetectConfig, SourceDocument};
use plagscan::{SimilarityMetric, Tokenizer};

fn plain() -> Tokenizer {
    Tokenizer::without_stop_words()
}

#[test]
fn demo_documents_produce_three_merged_segments() {
    let detection = detect(&plain(), demo::SUSPICIOUS, &demo::sources(), &DetectConfig::default()).unwrap();

    let texts: Vec<&str> = detection.segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "The quick brown fox jumps over the lazy",
            "Natural language processing is a field of artificial intelligence that focuses on the interaction between computers and human language",
            "Machine learning algorithms can be trained to recognize patterns in text and identify similarities between documents",
        ]
    );
    assert_eq!(detection.segments[0].sources, vec!["Source 1".to_string()]);
    assert_eq!(detection.segments[2].sources, vec!["Source 2".to_string()]);

    for seg in &detection.segments {
        assert_eq!(&demo::SUSPICIOUS[seg.suspicious_start..seg.suspicious_end], seg.text);
    }
    for pair in detection.segments.windows(2) {
        assert!(pair[0].suspicious_end < pair[1].suspicious_start);
    }
}

#[test]
fn demo_source_summary_and_similarity() {
    let detection = detect(&plain(), demo::SUSPICIOUS, &demo::sources(), &DetectConfig::default()).unwrap();

    let names: Vec<&str> = detection.source_matches.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Source 1", "Source 2"]);

    // 52 distinct suspicious 4-grams; 21 shared with source 1 and 13 with source 2
    let first = &detection.source_matches[0];
    let second = &detection.source_matches[1];
    assert_eq!(first.segments_count, 21);
    assert_eq!(second.segments_count, 13);
    assert!((first.similarity - 21.0 / 52.0).abs() < 1e-9);
    assert!((second.similarity - 13.0 / 52.0).abs() < 1e-9);
    assert!((detection.max_similarity - first.similarity).abs() < 1e-12);
}

#[test]
fn demo_near_duplicates_include_edited_sentence() {
    let detection = detect(&plain(), demo::SUSPICIOUS, &demo::sources(), &DetectConfig::default()).unwrap();

    assert_eq!(detection.near_matches.len(), 3);
    let fox = &detection.near_matches[0];
    assert_eq!(fox.source_name, "Source 1");
    assert!(fox.suspicious_text.ends_with("lazy dog."));
    assert!(fox.source_text.ends_with("lazy cat."));
    assert!(fox.ratio < 1.0);

    let machine = &detection.near_matches[2];
    assert_eq!(machine.source_name, "Source 2");
    assert!((machine.ratio - 1.0).abs() < 1e-9);
}

#[test]
fn unrelated_sources_are_clean() {
    let sources = vec![SourceDocument::new(
        "other",
        "Completely different words about gardening, tomatoes and soil moisture levels.",
    )];
    let detection = detect(&plain(), demo::SUSPICIOUS, &sources, &DetectConfig::default()).unwrap();

    assert!(detection.is_clean());
    assert!(detection.source_matches.is_empty());
    assert_eq!(detection.max_similarity, 0.0);
}

#[test]
fn self_comparison_scores_one_for_every_metric() {
    for metric in [
        SimilarityMetric::Containment,
        SimilarityMetric::Jaccard,
        SimilarityMetric::Cosine,
        SimilarityMetric::Winnowing,
    ] {
        let cfg = DetectConfig {
            metric,
            ..DetectConfig::default()
        };
        let result = compare(&plain(), demo::SUSPICIOUS, demo::SUSPICIOUS, &cfg);
        assert!((result.similarity - 1.0).abs() < 1e-9, "{metric}: {}", result.similarity);
        assert_eq!(result.segments.len(), 52);
    }
}

#[test]
fn stop_words_are_ignored_when_matching() {
    let suspicious = "The students wrote an essay about volcanic eruptions in Iceland during winter.";
    let source = "The students wrote the essay about volcanic eruptions in Iceland during the winter.";
    let cfg = DetectConfig {
        ngram_size: 3,
        ..DetectConfig::default()
    };

    let filtered = compare(&Tokenizer::english(), suspicious, source, &cfg);
    assert!((filtered.similarity - 1.0).abs() < 1e-9);
    for seg in &filtered.segments {
        assert_eq!(&suspicious[seg.suspicious_start..seg.suspicious_end], seg.text);
    }

    let unfiltered = compare(&plain(), suspicious, source, &cfg);
    assert!(unfiltered.similarity < 1.0);
}

#[test]
fn demo_with_english_stop_words() {
    let detection = detect(
        &Tokenizer::english(),
        demo::SUSPICIOUS,
        &demo::sources(),
        &DetectConfig::default(),
    )
    .unwrap();

    let texts: Vec<&str> = detection.segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "quick brown fox jumps over the lazy",
            "Natural language processing is a field of artificial intelligence that focuses on the interaction between computers and human language",
            "Machine learning algorithms can be trained to recognize patterns in text and identify similarities between documents",
        ]
    );

    // 31 content words leave 28 suspicious 4-grams
    let first = &detection.source_matches[0];
    let second = &detection.source_matches[1];
    assert_eq!((first.name.as_str(), first.segments_count, first.near_count), ("Source 1", 10, 2));
    assert_eq!((second.name.as_str(), second.segments_count, second.near_count), ("Source 2", 7, 1));
    assert!((first.similarity - 10.0 / 28.0).abs() < 1e-9);
    assert!((second.similarity - 7.0 / 28.0).abs() < 1e-9);
    assert!((detection.max_similarity - 10.0 / 28.0).abs() < 1e-9);

    assert_eq!(detection.near_matches.len(), 3);
    let fox = &detection.near_matches[0];
    assert!(fox.ratio >= 0.8 && fox.ratio < 1.0);
    assert!(detection.near_matches[1..].iter().all(|m| (m.ratio - 1.0).abs() < 1e-9));
}
