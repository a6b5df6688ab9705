//! QuizMentor - first-aid quiz generation over a retrieval index
//!
//! # Architecture
//!
//! ```text
//! PDF -> Extract -> Chunker -> Embedder -> FlatL2Store --save--> rag_index.json
//!                                                      \-------> rag_chunks.json
//!
//! Level + Topic -> Query -> Embedder -> Retriever <--load-- index pair
//!                                           |
//!                                        Context -> Prompt -> Generator
//!                                                                 |
//!                                                   Parser -> Question -> QuizSession
//!                                                                              |
//!                                                                          ResultLog
//! ```
//!
//! # Example
//!
//! ```ignore
//! use quizmentor_lib::{
//!     chunk::FixedChunker,
//!     config::Config,
//!     embed::MiniLmEmbedder,
//!     index::IndexBuilder,
//!     quiz::{Level, QuizAssembler},
//!     retrieve::Retriever,
//! };
//!
//! let config = Config::from_env()?;
//!
//! // Build the index once
//! let mut embedder = MiniLmEmbedder::new()?;
//! IndexBuilder::new(FixedChunker::default(), &mut embedder)
//!     .build_and_save("manuel_secourisme.pdf", &config.index_paths())?;
//!
//! // Generate questions
//! let retriever = Retriever::load(embedder, &config.index_paths())?;
//! let mut assembler = QuizAssembler::new(retriever, config.mistral_client()?);
//! let questions = assembler.generate(Level::Beginner, 3).await?;
//! ```

pub mod chunk;
pub mod config;
pub mod embed;
pub mod error;
pub mod generate;
pub mod index;
pub mod pdf;
pub mod quiz;
pub mod rag_client;
pub mod results;
pub mod retrieve;
pub mod store;
pub mod users;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
