//! Document chunking strategies
//!
//! Source text extracted from the training PDF is split into bounded-length
//! segments before embedding. Two strategies are available:
//! - fixed: plain slicing every `max_chars` characters
//! - line: prefer cutting right after the last line break inside the window
//!
//! Both strategies cover the input exactly: concatenating the chunk contents in
//! order gives back the original text. Lengths are counted in characters, not
//! bytes, so multi-byte text never splits inside a code point.
//!
//! # Implementing a Chunker
//!
//! ```ignore
//! use quizmentor_lib::chunk::Chunker;
//!
//! struct MyChunker { /* ... */ }
//!
//! impl Chunker for MyChunker {
//!     fn split<'a>(&self, content: &'a str) -> Vec<&'a str> {
//!         // Your chunking logic here
//!         todo!()
//!     }
//!
//!     fn name(&self) -> &str {
//!         "mine"
//!     }
//! }
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A chunk of text with its metadata
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Chunk {
    /// Content hash of this chunk
    pub id: String,
    /// The text content of this chunk
    pub content: String,
    /// Metadata about the source and position
    pub metadata: ChunkMetadata,
}

/// Metadata associated with a chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct ChunkMetadata {
    /// Position of the chunk within the source (0-indexed)
    pub position: usize,
    /// Character offset of the first character of the chunk
    pub offset: usize,
}

/// Trait for document chunking strategies
pub trait Chunker: Send + Sync {
    /// Split content into ordered, non-overlapping slices that cover it exactly.
    ///
    /// Empty content yields a single empty slice.
    fn split<'a>(&self, content: &'a str) -> Vec<&'a str>;

    /// Returns the name of this chunking strategy
    fn name(&self) -> &str;

    /// Split content into chunks carrying ids and position metadata
    fn chunk(&self, content: &str) -> Vec<Chunk> {
        let mut offset = 0;
        self.split(content)
            .into_iter()
            .enumerate()
            .map(|(position, piece)| {
                let metadata = ChunkMetadata { position, offset };
                offset += piece.chars().count();

                Chunk {
                    id: generate_id(piece),
                    content: piece.to_string(),
                    metadata,
                }
            })
            .collect()
    }
}

fn generate_id(string: &str) -> String {
    let mut hasher = DefaultHasher::new();
    string.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

/// Byte index just past the first `max_chars` characters of `s`, or `s.len()`.
pub(crate) fn char_boundary(s: &str, max_chars: usize) -> usize {
    s.char_indices().nth(max_chars).map_or(s.len(), |(i, _)| i)
}

mod fixed;
mod line;

pub use fixed::*;
pub use line::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_boundary() {
        assert_eq!(char_boundary("abcdef", 3), 3);
        assert_eq!(char_boundary("abc", 10), 3);
        assert_eq!(char_boundary("éàü", 2), 4);
        assert_eq!(char_boundary("", 5), 0);
    }

    #[test]
    fn test_chunk_metadata_offsets() {
        let chunker = FixedChunker { max_chars: 3 };
        let chunks = chunker.chunk("ééébbbc");

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].metadata.position, 1);
        assert_eq!(chunks[1].metadata.offset, 3);
        assert_eq!(chunks[2].metadata.offset, 6);
        assert_eq!(chunks[2].metadata, ChunkMetadata { position: 2, offset: 6 });
    }
}
