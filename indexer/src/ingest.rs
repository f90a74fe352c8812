//! Streams documents from JSON, JSONL and zstd-compressed JSONL files.
//!
//! Ids are assigned in stream order starting at zero. The stream checks its
//! [`CancelToken`] before producing each document and ends early once it fires.

use serde::Deserialize;
use sift_core::{DocId, Document};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("malformed document in {path} (line {line}): {source}")]
    Json { path: PathBuf, line: usize, source: serde_json::Error },

    #[error("failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Cooperative cancellation shared between the producer and whoever owns
/// the session. Fires when `cancel` is called or the deadline passes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self { Self::default() }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { flag: Arc::default(), deadline: Instant::now().checked_add(timeout) }
    }

    pub fn cancel(&self) { self.flag.store(true, Ordering::Release); }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    #[serde(alias = "body", alias = "abstract")]
    text: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

enum Records {
    Lines { path: PathBuf, lines: Lines<Box<dyn BufRead + Send>>, line: usize },
    Values { path: PathBuf, values: std::vec::IntoIter<serde_json::Value>, index: usize },
}

impl Records {
    fn open(path: &Path) -> Result<Self, IngestError> {
        let io_err = |source| IngestError::Io { path: path.to_path_buf(), source };
        let file = File::open(path).map_err(io_err)?;
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if name.ends_with(".jsonl.zst") {
            let decoder = zstd::Decoder::new(file).map_err(io_err)?;
            let reader: Box<dyn BufRead + Send> = Box::new(BufReader::new(decoder));
            return Ok(Records::Lines { path: path.to_path_buf(), lines: reader.lines(), line: 0 });
        }
        if name.ends_with(".jsonl") {
            let reader: Box<dyn BufRead + Send> = Box::new(BufReader::new(file));
            return Ok(Records::Lines { path: path.to_path_buf(), lines: reader.lines(), line: 0 });
        }

        let json: serde_json::Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| IngestError::Json { path: path.to_path_buf(), line: 0, source })?;
        let values = match json {
            serde_json::Value::Array(arr) => arr,
            obj @ serde_json::Value::Object(_) => vec![obj],
            _ => Vec::new(),
        };
        Ok(Records::Values { path: path.to_path_buf(), values: values.into_iter(), index: 0 })
    }

    fn next_record(&mut self) -> Option<Result<InputDoc, IngestError>> {
        match self {
            Records::Lines { path, lines, line } => loop {
                *line += 1;
                let text = match lines.next()? {
                    Ok(text) => text,
                    Err(source) => return Some(Err(IngestError::Io { path: path.clone(), source })),
                };
                if text.trim().is_empty() {
                    continue;
                }
                return Some(serde_json::from_str(&text).map_err(|source| IngestError::Json {
                    path: path.clone(),
                    line: *line,
                    source,
                }));
            },
            Records::Values { path, values, index } => {
                let value = values.next()?;
                *index += 1;
                Some(serde_json::from_value(value).map_err(|source| IngestError::Json {
                    path: path.clone(),
                    line: *index,
                    source,
                }))
            }
        }
    }
}

fn is_input_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".json") || name.ends_with(".jsonl") || name.ends_with(".jsonl.zst")
}

/// Lazy, finite document sequence over one input file or a directory tree.
pub struct DocumentStream {
    files: std::vec::IntoIter<PathBuf>,
    current: Option<Records>,
    next_id: DocId,
    cancel: CancelToken,
    finished: bool,
}

impl DocumentStream {
    pub fn open<P: AsRef<Path>>(input: P, cancel: CancelToken) -> Result<Self, IngestError> {
        let input = input.as_ref();
        let mut files = Vec::new();
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && is_input_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(input.to_path_buf());
        }
        tracing::debug!(files = files.len(), input = %input.display(), "opened document stream");
        Ok(Self { files: files.into_iter(), current: None, next_id: 0, cancel, finished: false })
    }
}

impl Iterator for DocumentStream {
    type Item = Result<Document, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if self.cancel.is_cancelled() {
                tracing::warn!(produced = self.next_id, "document stream cancelled");
                self.finished = true;
                return None;
            }
            if self.current.is_none() {
                let path = self.files.next()?;
                match Records::open(&path) {
                    Ok(records) => self.current = Some(records),
                    Err(err) => return Some(Err(err)),
                }
            }
            let Some(records) = self.current.as_mut() else { continue };
            match records.next_record() {
                None => self.current = None,
                Some(Err(err)) => {
                    // a read failure leaves the rest of the file unusable
                    if matches!(err, IngestError::Io { .. }) {
                        self.current = None;
                    }
                    return Some(Err(err));
                }
                Some(Ok(input)) => {
                    let id = self.next_id;
                    self.next_id += 1;
                    return Some(Ok(Document { id, text: input.text, title: input.title, url: input.url }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_fires_on_cancel_and_deadline() {
        let token = CancelToken::new();
        let shared = token.clone();
        assert!(!token.is_cancelled());
        shared.cancel();
        assert!(token.is_cancelled());

        assert!(CancelToken::with_timeout(Duration::ZERO).is_cancelled());
        assert!(!CancelToken::with_timeout(Duration::from_secs(3600)).is_cancelled());
    }

    #[test]
    fn recognizes_input_extensions() {
        assert!(is_input_file(Path::new("a/b.json")));
        assert!(is_input_file(Path::new("b.jsonl")));
        assert!(is_input_file(Path::new("dump.jsonl.zst")));
        assert!(!is_input_file(Path::new("notes.txt")));
    }
}
