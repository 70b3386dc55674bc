//! Guideline retrieval collaborator seam.
//!
//! The pipeline treats retrieval as an opaque similarity-search service: a
//! query string in, up to `top_k` scored snippets out. Backends (an embedded
//! vector store, a remote index) implement [`GuidelineRetriever`]; the core
//! only consumes the output shape and must keep working when the backend is
//! unreachable.

use thiserror::Error;

use crate::models::GuidelineHit;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval backend unavailable: {0}")]
    Unavailable(String),
    #[error("retrieval backend error: {0}")]
    Backend(String),
}

/// Opaque similarity-search collaborator.
///
/// Implementations may fail; the planner stage degrades any failure to an
/// empty contribution and records it in the audit log.
pub trait GuidelineRetriever: Send + Sync {
    fn query(&self, text: &str, top_k: usize) -> Result<Vec<GuidelineHit>, RetrievalError>;
}

/// Retriever for deployments without a guideline index. Always returns empty.
pub struct NoopRetriever;

impl GuidelineRetriever for NoopRetriever {
    fn query(&self, _text: &str, _top_k: usize) -> Result<Vec<GuidelineHit>, RetrievalError> {
        Ok(Vec::new())
    }
}
