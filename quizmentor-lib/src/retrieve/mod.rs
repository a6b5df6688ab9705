//! Query-time retrieval
//!
//! Combines an embedder and a loaded [`RagIndex`] into a search service. The
//! index is loaded once when the retriever is constructed and reused for every
//! query.
//!
//! # Usage
//!
//! ```ignore
//! use quizmentor_lib::retrieve::Retriever;
//!
//! let mut retriever = Retriever::load(embedder, &IndexPaths::in_dir("data"))?;
//! let context = retriever.retrieve("gestes de secours hémorragie", 5)?;
//! ```

use tracing::debug;

use crate::embed::Embedder;
use crate::index::{IndexPaths, RagIndex, SearchResult};
use crate::store::VectorStore;
use crate::{Error, Result};

/// Search service over a loaded index.
pub struct Retriever<E: Embedder> {
    embedder: E,
    index: RagIndex,
}

impl<E: Embedder> Retriever<E> {
    /// Wrap an index already in memory.
    ///
    /// The embedder must be the model the index was built with, with the same
    /// output dimension.
    pub fn new(embedder: E, index: RagIndex) -> Result<Self> {
        if embedder.model_name() != index.model() {
            return Err(Error::IndexMismatch(format!(
                "index was built with {}, retriever uses {}",
                index.model(),
                embedder.model_name()
            )));
        }
        if embedder.dimension() != index.store().dimension() {
            return Err(Error::IndexMismatch(format!(
                "index holds {}-dimensional vectors, embedder produces {}",
                index.store().dimension(),
                embedder.dimension()
            )));
        }
        Ok(Self { embedder, index })
    }

    /// Load the persisted index pair and wrap it.
    pub fn load(embedder: E, paths: &IndexPaths) -> Result<Self> {
        let index = RagIndex::load(paths)?;
        debug!(chunks = index.len(), "retriever ready");
        Self::new(embedder, index)
    }

    /// The `k` chunks closest to `query`, nearest first, with distances.
    pub fn search(&mut self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed_query(query)?;
        let results = self.index.search(&query_embedding, k)?;
        debug!(query, k, hits = results.len(), "retrieved");
        Ok(results)
    }

    /// The `k` chunk texts closest to `query`, nearest first.
    pub fn retrieve(&mut self, query: &str, k: usize) -> Result<Vec<String>> {
        Ok(self
            .search(query, k)?
            .into_iter()
            .map(|r| r.content)
            .collect())
    }

    /// Returns the number of indexed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no chunks are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns a reference to the loaded index.
    #[must_use]
    pub fn index(&self) -> &RagIndex {
        &self.index
    }
}
