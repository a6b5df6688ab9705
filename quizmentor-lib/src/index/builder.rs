use std::path::Path;

use tracing::info;

use crate::chunk::Chunker;
use crate::embed::Embedder;
use crate::index::{IndexPaths, RagIndex};
use crate::pdf;
use crate::store::{FlatL2Store, VectorStore};
use crate::{Error, Result};

/// One-shot index construction: chunk, embed, pair, persist.
///
/// There is no incremental path; a changed document means a full rebuild that
/// replaces both artifacts.
pub struct IndexBuilder<'a, C: Chunker, E: Embedder> {
    chunker: C,
    embedder: &'a mut E,
}

impl<'a, C: Chunker, E: Embedder> IndexBuilder<'a, C, E> {
    #[must_use]
    pub fn new(chunker: C, embedder: &'a mut E) -> Self {
        Self { chunker, embedder }
    }

    /// Build an index over `text`.
    ///
    /// Fails on blank text and on any embedding failure; nothing is returned
    /// half-built.
    pub fn build_from_text(&mut self, text: &str) -> Result<RagIndex> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("document contains no text".to_string()));
        }

        let chunks = self.chunker.split(text);
        info!(
            chunks = chunks.len(),
            strategy = self.chunker.name(),
            "document chunked"
        );

        let embeddings = self.embedder.embed_documents(&chunks)?;
        if embeddings.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "{} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let mut store = FlatL2Store::new(self.embedder.dimension());
        store.add(&embeddings)?;

        RagIndex::new(
            self.embedder.model_name(),
            store,
            chunks.into_iter().map(str::to_string).collect(),
        )
    }

    /// Build an index over the text of a PDF, pages joined in order.
    pub fn build_from_pdf(&mut self, pdf_path: impl AsRef<Path>) -> Result<RagIndex> {
        let pdf_path = pdf_path.as_ref();
        let text = pdf::extract_text(pdf_path)?;
        info!(chars = text.chars().count(), path = %pdf_path.display(), "pdf loaded");
        self.build_from_text(&text)
    }

    /// Build from a PDF and write both artifacts.
    pub fn build_and_save(
        &mut self,
        pdf_path: impl AsRef<Path>,
        paths: &IndexPaths,
    ) -> Result<RagIndex> {
        let index = self.build_from_pdf(pdf_path)?;
        index.save(paths)?;
        Ok(index)
    }
}
