//! Persisted retrieval index
//!
//! A [`RagIndex`] pairs a [`FlatL2Store`] with the chunk texts it was built
//! from: vector `i` embeds chunk `i`. The pair lives on disk as two files that
//! are always written and loaded together:
//!
//! ```text
//! <dir>/rag_index.json   model name, chunk count, chunk fingerprint, vectors
//! <dir>/rag_chunks.json  ordered chunk texts
//! ```
//!
//! The index file records the chunk count and a SHA-256 fingerprint of the
//! chunk sequence, so a chunk file from another build is rejected at load time
//! instead of silently shifting every search result.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::embed::Embedding;
use crate::store::{FlatL2Store, VectorStore};
use crate::{Error, Result};

pub const INDEX_FILE: &str = "rag_index.json";
pub const CHUNKS_FILE: &str = "rag_chunks.json";

/// Locations of the two index artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPaths {
    pub index: PathBuf,
    pub chunks: PathBuf,
}

impl IndexPaths {
    /// Default file names inside `dir`
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            index: dir.join(INDEX_FILE),
            chunks: dir.join(CHUNKS_FILE),
        }
    }
}

/// A retrieved chunk
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Position of the chunk in the source document
    pub position: usize,
    /// The chunk text
    pub content: String,
    /// Squared L2 distance to the query (lower is closer)
    pub distance: f32,
}

/// Embeddings plus the chunk texts they were computed from
#[derive(Debug, Clone)]
pub struct RagIndex {
    model: String,
    store: FlatL2Store,
    chunks: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct IndexFile {
    model: String,
    metric: String,
    chunk_count: usize,
    chunks_sha256: String,
    dimension: usize,
    vectors: Vec<Embedding>,
}

impl RagIndex {
    /// Pair a store with its chunks.
    ///
    /// Fails when the two sides do not have the same length.
    pub fn new(model: impl Into<String>, store: FlatL2Store, chunks: Vec<String>) -> Result<Self> {
        if store.len() != chunks.len() {
            return Err(Error::IndexMismatch(format!(
                "{} vectors for {} chunks",
                store.len(),
                chunks.len()
            )));
        }
        Ok(Self {
            model: model.into(),
            store,
            chunks,
        })
    }

    /// Name of the embedding model the vectors came from
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn store(&self) -> &FlatL2Store {
        &self.store
    }

    #[must_use]
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Nearest chunks to an already-embedded query, closest first.
    pub fn search(&self, query: &Embedding, k: usize) -> Result<Vec<SearchResult>> {
        self.store
            .search(query, k)?
            .into_iter()
            .map(|n| {
                let content = self.chunks.get(n.position).ok_or_else(|| {
                    Error::IndexMismatch(format!("no chunk at position {}", n.position))
                })?;
                Ok(SearchResult {
                    position: n.position,
                    content: content.clone(),
                    distance: n.distance,
                })
            })
            .collect()
    }

    /// Write both artifacts.
    ///
    /// Each file is written to a `.tmp` sibling first; the renames happen only
    /// once both temporaries are complete.
    pub fn save(&self, paths: &IndexPaths) -> Result<()> {
        let file = IndexFile {
            model: self.model.clone(),
            metric: "l2".to_string(),
            chunk_count: self.chunks.len(),
            chunks_sha256: fingerprint(&self.chunks),
            dimension: self.store.dimension(),
            vectors: (0..self.store.len())
                .filter_map(|i| self.store.vector(i).cloned())
                .collect(),
        };

        let index_tmp = tmp_path(&paths.index);
        let chunks_tmp = tmp_path(&paths.chunks);

        let written = write_json(&index_tmp, &file, false)
            .and_then(|()| write_json(&chunks_tmp, &self.chunks, true));
        if let Err(e) = written {
            discard(&[index_tmp.as_path(), chunks_tmp.as_path()]);
            return Err(e);
        }

        let renamed = fs::rename(&chunks_tmp, &paths.chunks)
            .and_then(|()| fs::rename(&index_tmp, &paths.index));
        if let Err(e) = renamed {
            discard(&[index_tmp.as_path(), chunks_tmp.as_path()]);
            return Err(e.into());
        }

        info!(
            chunks = self.chunks.len(),
            index = %paths.index.display(),
            "index saved"
        );
        Ok(())
    }

    /// Load both artifacts and check that they belong together.
    pub fn load(paths: &IndexPaths) -> Result<Self> {
        for path in [&paths.index, &paths.chunks] {
            if !path.exists() {
                return Err(Error::IndexNotBuilt(path.clone()));
            }
        }

        let file: IndexFile = serde_json::from_slice(&fs::read(&paths.index)?)?;
        let chunks: Vec<String> = serde_json::from_slice(&fs::read(&paths.chunks)?)?;
        debug!(model = %file.model, chunks = chunks.len(), "index files read");

        if file.metric != "l2" {
            return Err(Error::IndexMismatch(format!(
                "unsupported metric {:?}",
                file.metric
            )));
        }
        if file.chunk_count != chunks.len() || file.vectors.len() != chunks.len() {
            return Err(Error::IndexMismatch(format!(
                "index records {} chunks and holds {} vectors, chunk file has {}",
                file.chunk_count,
                file.vectors.len(),
                chunks.len()
            )));
        }
        if file.chunks_sha256 != fingerprint(&chunks) {
            return Err(Error::IndexMismatch(
                "chunk file does not match the one the index was built from".to_string(),
            ));
        }

        let store = FlatL2Store::from_parts(file.dimension, file.vectors)?;
        Self::new(file.model, store, chunks)
    }
}

/// SHA-256 over the chunk sequence, each chunk length-prefixed.
fn fingerprint(chunks: &[String]) -> String {
    let mut hasher = Sha256::new();
    for chunk in chunks {
        hasher.update((chunk.len() as u64).to_le_bytes());
        hasher.update(chunk.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn discard(paths: &[&Path]) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    fs::write(path, bytes)?;
    Ok(())
}

mod builder;

pub use builder::*;
