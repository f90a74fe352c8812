//! Per-shard storage. `ShardData` holds no lock of its own; the index wraps
//! each one in a `RwLock`.

use crate::DocId;
use std::collections::{BTreeMap, HashMap};

/// 32-bit FNV-1a over the term's chars.
pub fn fnv32(term: &str) -> u32 {
    let mut h: u32 = 2_166_136_261;
    for c in term.chars() {
        h ^= c as u32;
        h = h.wrapping_mul(16_777_619);
    }
    h
}

/// Shard that owns `term` out of `shard_count`.
#[inline]
pub fn shard_for(term: &str, shard_count: usize) -> usize {
    (fnv32(term) % shard_count as u32) as usize
}

#[derive(Debug, Default)]
pub struct ShardData {
    postings: HashMap<String, Vec<DocId>>,
    tf: HashMap<String, HashMap<DocId, f32>>,
}

/// Sorted, lock-free copy of one term's entries.
#[derive(Debug, Clone, PartialEq)]
pub struct TermSnapshot {
    pub postings: Vec<DocId>,
    pub frequencies: BTreeMap<DocId, f32>,
}

impl ShardData {
    pub fn new() -> Self { Self::default() }

    /// Append `doc` to the postings of `term` and record its frequency.
    /// Append-only: inserting the same pair twice duplicates the posting.
    pub fn insert(&mut self, term: &str, doc: DocId, freq: f32) {
        match self.postings.get_mut(term) {
            Some(list) => list.push(doc),
            None => {
                self.postings.insert(term.to_string(), vec![doc]);
            }
        }
        self.tf.entry(term.to_string()).or_default().insert(doc, freq);
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn frequency(&self, term: &str, doc: DocId) -> Option<f32> {
        self.tf.get(term).and_then(|m| m.get(&doc)).copied()
    }

    /// `idf * tf` for every posting of `term`; empty when the term is absent.
    pub fn partial_scores(&self, term: &str, corpus_size: usize, weight: f32) -> Vec<(DocId, f32)> {
        let (Some(ids), Some(freqs)) = (self.postings.get(term), self.tf.get(term)) else {
            return Vec::new();
        };
        let idf = idf(corpus_size, ids.len());
        ids.iter()
            .map(|id| (*id, idf * freqs.get(id).copied().unwrap_or(0.0) * weight))
            .collect()
    }

    pub fn term_count(&self) -> usize { self.postings.len() }

    pub fn snapshot(&self) -> BTreeMap<String, TermSnapshot> {
        self.postings
            .iter()
            .map(|(term, ids)| {
                let mut postings = ids.clone();
                postings.sort_unstable();
                let frequencies = self.tf.get(term)
                    .map(|m| m.iter().map(|(d, f)| (*d, *f)).collect())
                    .unwrap_or_default();
                (term.clone(), TermSnapshot { postings, frequencies })
            })
            .collect()
    }
}

/// `ln(corpus_size / (postings + 1))`
pub fn idf(corpus_size: usize, postings: usize) -> f32 {
    (corpus_size as f64 / (postings as f64 + 1.0)).ln() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_is_stable_and_in_range() {
        for term in ["cat", "dog", "ünïcode", ""] {
            let s = shard_for(term, 7);
            assert!(s < 7);
            assert_eq!(s, shard_for(term, 7));
        }
        assert_eq!(shard_for("anything", 1), 0);
        // FNV-1a offset basis for the empty string
        assert_eq!(fnv32(""), 2_166_136_261);
    }

    #[test]
    fn postings_and_frequencies_share_keys() {
        let mut shard = ShardData::new();
        shard.insert("cat", 0, 0.5);
        shard.insert("cat", 2, 0.25);
        shard.insert("dog", 2, 0.25);

        let snap = shard.snapshot();
        for entry in snap.values() {
            let keys: Vec<DocId> = entry.frequencies.keys().copied().collect();
            assert_eq!(entry.postings, keys);
        }
        assert_eq!(shard.term_count(), 2);
        assert_eq!(shard.frequency("cat", 2), Some(0.25));
        assert_eq!(shard.frequency("cat", 1), None);
    }

    #[test]
    fn repeated_insert_appends() {
        let mut shard = ShardData::new();
        shard.insert("cat", 4, 1.0);
        shard.insert("cat", 4, 1.0);
        assert_eq!(shard.postings("cat"), Some(&[4, 4][..]));
    }

    #[test]
    fn partial_scores_weight_by_idf() {
        let mut shard = ShardData::new();
        shard.insert("cat", 0, 0.5);
        let scores = shard.partial_scores("cat", 10, 1.0);
        let expected = (10.0f64 / 2.0).ln() as f32 * 0.5;
        assert_eq!(scores.len(), 1);
        assert!((scores[0].1 - expected).abs() < 1e-6);
        assert!(shard.partial_scores("missing", 10, 1.0).is_empty());
    }

    #[test]
    fn idf_does_not_grow_with_postings() {
        let mut last = f32::INFINITY;
        for n in 0..50 {
            let v = idf(100, n);
            assert!(v <= last);
            last = v;
        }
    }
}
