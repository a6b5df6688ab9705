//! Shared fixtures for unit tests

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::embed::{Embedder, HashingEmbedder};
use crate::generate::{GenerationRequest, Generator};
use crate::index::RagIndex;
use crate::retrieve::Retriever;
use crate::store::{FlatL2Store, VectorStore};
use crate::{Error, Result};

pub(crate) const SAMPLE_CHUNKS: [&str; 3] = [
    "Hémorragie : comprimer directement la plaie avec la main ou un pansement.",
    "Arrêt cardiaque : alerter, masser, défibriller sans attendre.",
    "Brûlure : refroidir sous l'eau tempérée pendant vingt minutes.",
];

/// Retriever over [`SAMPLE_CHUNKS`] using a 128-dimension hashing embedder.
pub(crate) fn sample_retriever() -> Retriever<HashingEmbedder> {
    let mut embedder = HashingEmbedder::new(128);
    let embeddings = embedder.embed_documents(&SAMPLE_CHUNKS).unwrap();
    let mut store = FlatL2Store::new(128);
    store.add(&embeddings).unwrap();

    let chunks = SAMPLE_CHUNKS.iter().map(|c| c.to_string()).collect();
    let index = RagIndex::new(HashingEmbedder::MODEL_NAME, store, chunks).unwrap();
    Retriever::new(embedder, index).unwrap()
}

/// Generator replaying canned responses and recording prompts.
pub(crate) struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub(crate) fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Generation("script exhausted".to_string())))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Write a PDF with one line of Courier text per page.
pub(crate) fn write_pdf(path: &Path, page_texts: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
