use sift_core::tokenizer::{lowercase, stem, tokenize};
use sift_core::{Analyzer, StopWords};

#[test]
fn it_normalizes_and_stems() {
    let words = Analyzer::default().analyze("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // apostrophes separate tokens
    assert!(words.contains(&"café".to_string()));
    assert!(words.contains(&"s".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let words = Analyzer::default().analyze("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.first().map(String::as_str), Some("quick"));
}

#[test]
fn analyzers_are_configured_independently() {
    let plain = Analyzer::new(StopWords::none());
    let custom = Analyzer::new(["quick", "Fox"].into_iter().collect());
    let text = "the quick fox";

    assert_eq!(plain.analyze(text), vec!["the", "quick", "fox"]);
    assert_eq!(custom.analyze(text), vec!["the"]);
    assert_eq!(Analyzer::default().analyze(text), vec!["quick", "fox"]);
}

#[test]
fn stages_compose_into_analyze() {
    let text = "Dogs CHASED the Cats, 42 times";
    let analyzer = Analyzer::default();
    let staged = stem(analyzer.filter_stopwords(lowercase(tokenize(text))));
    assert_eq!(staged, analyzer.analyze(text));
    assert_eq!(staged, vec!["dog", "chase", "cat", "42", "time"]);
}

#[test]
fn empty_and_separator_only_input() {
    let analyzer = Analyzer::default();
    assert!(analyzer.analyze("").is_empty());
    assert!(analyzer.analyze("  ,;-- !! ").is_empty());
}
