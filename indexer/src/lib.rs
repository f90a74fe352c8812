pub mod ingest;
pub mod pipeline;

pub use ingest::{CancelToken, DocumentStream, IngestError};
pub use pipeline::{index_stream, Ingested};
