use serde::{Deserialize, Serialize};

use crate::embed::Embedding;
use crate::store::{Neighbor, VectorStore};
use crate::{Error, Result};

/// Flat (exhaustive) L2 index.
///
/// Brute-force squared Euclidean distance against every stored vector. Exact,
/// and fast enough for a single handbook worth of chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatL2Store {
    dimension: usize,
    vectors: Vec<Embedding>,
}

impl FlatL2Store {
    /// Create a new empty store for vectors of `dimension` floats.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    /// Rebuild a store from persisted parts, checking every vector's dimension.
    pub fn from_parts(dimension: usize, vectors: Vec<Embedding>) -> Result<Self> {
        if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimension) {
            return Err(Error::IndexMismatch(format!(
                "vector {i} has {} dimensions, expected {dimension}",
                v.len()
            )));
        }
        Ok(Self { dimension, vectors })
    }

    /// Stored vector at `position`
    #[must_use]
    pub fn vector(&self, position: usize) -> Option<&Embedding> {
        self.vectors.get(position)
    }

    fn check_dimension(&self, v: &[f32]) -> Result<()> {
        if v.len() != self.dimension {
            return Err(Error::Index(format!(
                "vector has {} dimensions, index expects {}",
                v.len(),
                self.dimension
            )));
        }
        Ok(())
    }
}

impl VectorStore for FlatL2Store {
    fn add(&mut self, embeddings: &[Embedding]) -> Result<()> {
        for embedding in embeddings {
            self.check_dimension(embedding)?;
        }
        self.vectors.extend_from_slice(embeddings);
        Ok(())
    }

    fn search(&self, query: &Embedding, k: usize) -> Result<Vec<Neighbor>> {
        self.check_dimension(query)?;

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| Neighbor {
                position,
                distance: squared_l2(query, v),
            })
            .collect();

        // stable sort keeps insertion order between equal distances
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

/// Squared Euclidean distance between two vectors of equal length.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
