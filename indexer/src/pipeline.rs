use crate::ingest::IngestError;
use sift_core::{Corpus, Document, ShardedIndex};
use std::time::Instant;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// What made it into the index, plus the error that stopped ingestion, if any.
pub struct Ingested {
    pub corpus: Corpus,
    pub error: Option<IngestError>,
}

/// Drain `docs` into `index` in batches of `batch_size`. Stops at the first
/// ingestion error; every batch committed before it stays searchable.
pub fn index_stream<I>(docs: I, index: &ShardedIndex, batch_size: usize) -> Ingested
where
    I: IntoIterator<Item = Result<Document, IngestError>>,
{
    let start = Instant::now();
    let batch_size = batch_size.max(1);
    let mut corpus = Corpus::new();
    let mut batch: Vec<Document> = Vec::with_capacity(batch_size);
    let mut error = None;

    for doc in docs {
        match doc {
            Ok(doc) => {
                batch.push(doc);
                if batch.len() >= batch_size {
                    index.add(&batch);
                    corpus.extend(batch.drain(..));
                }
            }
            Err(err) => {
                error = Some(err);
                break;
            }
        }
    }
    if !batch.is_empty() {
        index.add(&batch);
        corpus.extend(batch);
    }

    tracing::info!(
        documents = corpus.len(),
        terms = index.term_count(),
        elapsed = ?start.elapsed(),
        "indexing completed"
    );
    Ingested { corpus, error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn docs(n: u32) -> Vec<Result<Document, IngestError>> {
        (0..n).map(|i| Ok(Document::new(i, format!("wild cat number {i}")))).collect()
    }

    #[test]
    fn partial_batches_are_flushed() {
        let index = ShardedIndex::new(4).unwrap();
        let out = index_stream(docs(25), &index, 10);
        assert!(out.error.is_none());
        assert_eq!(out.corpus.len(), 25);
        assert_eq!(index.postings("cat").unwrap().len(), 25);
    }

    #[test]
    fn error_keeps_committed_documents() {
        let index = ShardedIndex::new(4).unwrap();
        let mut input = docs(5);
        input.push(Err(IngestError::Io {
            path: PathBuf::from("broken.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated"),
        }));
        input.extend(docs(3));

        let out = index_stream(input, &index, 2);
        assert!(matches!(out.error, Some(IngestError::Io { .. })));
        assert_eq!(out.corpus.len(), 5);
        assert_eq!(index.search("cat", 10, &out.corpus).len(), 5);
    }
}
