use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    // Snowball's English stopword list. These pass through the stemmer untouched.
    static ref UNSTEMMED: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","did","do","does","doing","don","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself","just",
            "me","more","most","my","myself",
            "no","nor","not","now","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
            "s","same","she","should","so","some","such",
            "t","than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","will","with",
            "you","your","yours","yourself","yourselves",
        ];
        words.iter().copied().collect()
    };
}

const ENGLISH: &[&str] = &["a", "and", "be", "have", "i", "in", "of", "that", "the", "to"];

/// Immutable stopword set handed to an [`Analyzer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The default closed set of common English words.
    pub fn english() -> Self {
        ENGLISH.iter().copied().collect()
    }

    pub fn none() -> Self {
        Self { words: HashSet::new() }
    }

    /// Parse a word list: one word per line, `#` starts a comment, blank lines are skipped.
    pub fn parse(list: &str) -> Self {
        list.lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|word| !word.is_empty())
            .collect()
    }

    pub fn contains(&self, token: &str) -> bool { self.words.contains(token) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

impl Default for StopWords {
    fn default() -> Self { Self::english() }
}

impl<S: AsRef<str>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { words: iter.into_iter().map(|w| w.as_ref().to_lowercase()).collect() }
    }
}

/// Text analysis shared by indexing and querying:
/// tokenize, lowercase, drop stopwords, then stem.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    stopwords: StopWords,
}

impl Analyzer {
    pub fn new(stopwords: StopWords) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopWords { &self.stopwords }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = lowercase(tokenize(text));
        let tokens = self.filter_stopwords(tokens);
        stem(tokens)
    }

    pub fn filter_stopwords(&self, mut tokens: Vec<String>) -> Vec<String> {
        tokens.retain(|t| !self.stopwords.contains(t));
        tokens
    }
}

/// Split text into maximal runs of Unicode letters and numbers.
pub fn tokenize(text: &str) -> Vec<String> {
    RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

pub fn lowercase(mut tokens: Vec<String>) -> Vec<String> {
    for token in tokens.iter_mut() {
        *token = token.to_lowercase();
    }
    tokens
}

/// Snowball English stemming. Words on Snowball's own stopword list are
/// returned as-is, independent of the analyzer's [`StopWords`].
pub fn stem(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| if UNSTEMMED.contains(t.as_str()) { t } else { STEMMER.stem(&t).into_owned() })
        .collect()
}
