//! Vector storage
//!
//! Stores hold embeddings only. Vector `i` always belongs to chunk `i` of the
//! owning [`RagIndex`](crate::index::RagIndex); stores never reorder or
//! deduplicate what they are given.
//!
//! # Usage
//!
//! ```ignore
//! use quizmentor_lib::store::{FlatL2Store, VectorStore};
//!
//! let mut store = FlatL2Store::new(384);
//!
//! // Append embeddings in chunk order
//! store.add(&embeddings)?;
//!
//! // Nearest positions by L2 distance
//! let neighbors = store.search(&query_embedding, 5)?;
//! ```

use crate::embed::Embedding;
use crate::Result;

/// A nearest-neighbour hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the matched vector in insertion order
    pub position: usize,
    /// Squared Euclidean distance to the query (lower is closer)
    pub distance: f32,
}

/// Trait for vector storage backends
pub trait VectorStore: Send + Sync {
    /// Append embeddings, keeping insertion order
    fn add(&mut self, embeddings: &[Embedding]) -> Result<()>;

    /// Search for the nearest stored vectors
    ///
    /// # Returns
    /// At most `k` neighbours sorted by distance (closest first)
    fn search(&self, query: &Embedding, k: usize) -> Result<Vec<Neighbor>>;

    /// Dimension every stored vector has
    fn dimension(&self) -> usize;

    /// Get total number of stored vectors
    fn len(&self) -> usize;

    /// Check if store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

mod flat;

pub use flat::*;
