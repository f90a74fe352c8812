use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod error;
pub mod index;
pub mod rank;
pub mod shard;
pub mod tokenizer;

pub use error::{IndexError, Result};
pub use index::{IndexConfig, ShardedIndex};
pub use rank::ScoredDoc;
pub use tokenizer::{Analyzer, StopWords};

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Document {
    pub fn new(id: DocId, text: impl Into<String>) -> Self {
        Self { id, text: text.into(), title: None, url: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: DocId,
    pub score: f32,
    pub text: String,
}

/// Caller-owned document collection. The index only stores ids, so display
/// text for ranked hits is resolved through here.
#[derive(Debug, Default)]
pub struct Corpus {
    docs: Vec<Document>,
    by_id: HashMap<DocId, usize>,
}

impl Corpus {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, doc: Document) {
        self.by_id.insert(doc.id, self.docs.len());
        self.docs.push(doc);
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.by_id.get(&id).map(|&pos| &self.docs[pos])
    }

    pub fn text(&self, id: DocId) -> Option<&str> {
        self.get(id).map(|d| d.text.as_str())
    }

    pub fn documents(&self) -> &[Document] { &self.docs }
}

impl Extend<Document> for Corpus {
    fn extend<I: IntoIterator<Item = Document>>(&mut self, iter: I) {
        for doc in iter {
            self.push(doc);
        }
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        corpus.extend(iter);
        corpus
    }
}
