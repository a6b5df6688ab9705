//! Text embedding
//!
//! The index builder and the retriever must use the same [`Embedder`]: the
//! model name is persisted with the index and checked again at load time.
//!
//! Two implementations are provided:
//! - [`MiniLmEmbedder`]: sentence-transformers/all-MiniLM-L6-v2 via the
//!   fastembed crate (ONNX runtime), 384 dimensions
//! - [`HashingEmbedder`]: deterministic bag-of-words hashing, no model download
//!
//! # Usage
//!
//! ```ignore
//! use quizmentor_lib::embed::{Embedder, MiniLmEmbedder};
//!
//! let mut embedder = MiniLmEmbedder::new()?;
//!
//! // Embed documents (for indexing)
//! let doc_embeddings = embedder.embed_documents(&["Compression directe...", "PLS..."])?;
//!
//! // Embed query (for searching)
//! let query_embedding = embedder.embed_query("hémorragie externe")?;
//! ```

use crate::Result;

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
pub trait Embedder: Send + Sync {
    /// Embed multiple documents for indexing
    ///
    /// Returns exactly one embedding per input, in input order.
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single query for searching
    fn embed_query(&mut self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        (**self).embed_documents(texts)
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        (**self).embed_query(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

mod hashing;
mod minilm;

pub use hashing::*;
pub use minilm::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_embedder_forwards() {
        let mut direct = HashingEmbedder::new(32);
        let mut boxed: Box<dyn Embedder> = Box::new(HashingEmbedder::new(32));

        assert_eq!(boxed.dimension(), 32);
        assert_eq!(boxed.model_name(), HashingEmbedder::MODEL_NAME);
        assert_eq!(
            boxed.embed_query("position latérale").unwrap(),
            direct.embed_query("position latérale").unwrap()
        );
    }
}
