//! Score aggregation and top-k selection. Runs on partial scores already
//! copied out of the shards, so no shard lock is held here.

use crate::DocId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub id: DocId,
    pub score: f32,
}

/// Sum partial scores per document in one pass.
pub fn aggregate<I>(partials: I) -> HashMap<DocId, f32>
where
    I: IntoIterator<Item = Vec<(DocId, f32)>>,
{
    let mut scores: HashMap<DocId, f32> = HashMap::new();
    for batch in partials {
        for (id, score) in batch {
            *scores.entry(id).or_insert(0.0) += score;
        }
    }
    scores
}

/// Highest score first, ties broken by ascending id.
pub fn by_relevance(a: &ScoredDoc, b: &ScoredDoc) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}

pub fn top_k(scores: HashMap<DocId, f32>, k: usize) -> Vec<ScoredDoc> {
    if k == 0 {
        return Vec::new();
    }
    let mut ranked: Vec<ScoredDoc> = scores
        .into_iter()
        .map(|(id, score)| ScoredDoc { id, score })
        .collect();
    if ranked.len() > k {
        ranked.select_nth_unstable_by(k - 1, by_relevance);
        ranked.truncate(k);
    }
    ranked.sort_unstable_by(by_relevance);
    ranked
}
