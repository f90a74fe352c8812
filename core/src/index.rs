//! Sharded in-memory inverted index.
//!
//! The vocabulary is partitioned by term hash, so a term's postings and
//! frequencies live in exactly one shard. Writers and readers only contend
//! when they touch the same shard.

use crate::error::{IndexError, Result};
use crate::rank::{self, ScoredDoc};
use crate::shard::{shard_for, ShardData, TermSnapshot};
use crate::tokenizer::Analyzer;
use crate::{Corpus, DocId, Document, SearchResult};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    pub shards: usize,
    /// Maximum number of documents analyzed concurrently by `add`.
    pub workers: usize,
}

impl Default for IndexConfig {
    fn default() -> Self { Self { shards: 8, workers: 8 } }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.shards == 0 {
            return Err(IndexError::Configuration("shard count must be greater than zero".into()));
        }
        if self.workers == 0 {
            return Err(IndexError::Configuration("worker count must be greater than zero".into()));
        }
        Ok(())
    }
}

pub struct ShardedIndex {
    shards: Vec<RwLock<ShardData>>,
    analyzer: Analyzer,
    pool: rayon::ThreadPool,
}

impl ShardedIndex {
    pub fn new(shards: usize) -> Result<Self> {
        Self::with_config(IndexConfig { shards, ..IndexConfig::default() }, Analyzer::default())
    }

    pub fn with_config(config: IndexConfig, analyzer: Analyzer) -> Result<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("sift-worker-{i}"))
            .build()?;
        let shards = (0..config.shards).map(|_| RwLock::new(ShardData::new())).collect();
        tracing::debug!(shards = config.shards, workers = config.workers, "index created");
        Ok(Self { shards, analyzer, pool })
    }

    pub fn shard_count(&self) -> usize { self.shards.len() }

    pub fn analyzer(&self) -> &Analyzer { &self.analyzer }

    /// Index a batch of documents. Returns once every document is committed.
    /// Calls accumulate: adding the same batch twice duplicates its postings.
    pub fn add(&self, docs: &[Document]) {
        let start = Instant::now();
        self.pool.install(|| docs.par_iter().for_each(|doc| self.add_document(doc)));
        tracing::debug!(documents = docs.len(), elapsed = ?start.elapsed(), "batch indexed");
    }

    fn add_document(&self, doc: &Document) {
        let tokens = self.analyzer.analyze(&doc.text);
        if tokens.is_empty() {
            return;
        }
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for t in tokens.iter() {
            *counts.entry(t.as_str()).or_insert(0) += 1;
        }
        let total = tokens.len() as f32;
        for (term, n) in counts {
            let slot = shard_for(term, self.shards.len());
            tracing::trace!(shard = slot, term, doc_id = doc.id, "posting added");
            let mut shard = self.shards[slot].write();
            shard.insert(term, doc.id, n as f32 / total);
        }
    }

    /// Rank documents for `query`. `corpus_size` is the number of documents
    /// indexed so far and feeds the idf term.
    pub fn search_scores(&self, query: &str, max_results: usize, corpus_size: usize) -> Vec<ScoredDoc> {
        let start = Instant::now();
        let terms = self.analyzer.analyze(query);
        if terms.is_empty() || max_results == 0 {
            return Vec::new();
        }

        // Repeated query terms add repeated score mass.
        let mut distinct: Vec<(String, u32)> = Vec::with_capacity(terms.len());
        for term in terms {
            match distinct.iter_mut().find(|(t, _)| *t == term) {
                Some((_, n)) => *n += 1,
                None => distinct.push((term, 1)),
            }
        }

        let partials: Vec<Vec<(DocId, f32)>> = self.pool.install(|| {
            distinct
                .par_iter()
                .map(|(term, n)| {
                    let slot = shard_for(term, self.shards.len());
                    tracing::trace!(shard = slot, term = term.as_str(), "term lookup");
                    let shard = self.shards[slot].read();
                    shard.partial_scores(term, corpus_size, *n as f32)
                })
                .collect()
        });

        let ranked = rank::top_k(rank::aggregate(partials), max_results);
        tracing::debug!(
            terms = distinct.len(),
            results = ranked.len(),
            elapsed = ?start.elapsed(),
            "search completed"
        );
        ranked
    }

    /// Rank against `corpus` and attach each hit's text.
    pub fn search(&self, query: &str, max_results: usize, corpus: &Corpus) -> Vec<SearchResult> {
        self.search_scores(query, max_results, corpus.len())
            .into_iter()
            .map(|hit| {
                let text = match corpus.text(hit.id) {
                    Some(text) => text.to_string(),
                    None => {
                        tracing::warn!(doc_id = hit.id, "ranked document missing from corpus");
                        String::new()
                    }
                };
                SearchResult { id: hit.id, score: hit.score, text }
            })
            .collect()
    }

    pub fn postings(&self, term: &str) -> Option<Vec<DocId>> {
        let shard = self.shards[shard_for(term, self.shards.len())].read();
        shard.postings(term).map(<[DocId]>::to_vec)
    }

    pub fn term_frequency(&self, term: &str, doc: DocId) -> Option<f32> {
        self.shards[shard_for(term, self.shards.len())].read().frequency(term, doc)
    }

    pub fn term_count(&self) -> usize {
        self.shards.iter().map(|s| s.read().term_count()).sum()
    }

    /// Per-shard copy of the index with postings sorted, for comparing states.
    pub fn snapshot(&self) -> Vec<BTreeMap<String, TermSnapshot>> {
        self.shards.iter().map(|s| s.read().snapshot()).collect()
    }
}
