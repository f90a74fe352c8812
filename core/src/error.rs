//! Errors surfaced by the index. Only construction can fail; adding and
//! searching are total over well-formed input.

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Invalid shard count or worker width
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The worker pool could not be started
    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, IndexError>;
