//! Text generation
//!
//! The quiz assembler talks to a chat-style completion service through the
//! [`Generator`] trait. [`MistralClient`] is the production implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request envelope shared by generators
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

impl GenerationRequest {
    /// A single user message
    #[must_use]
    pub fn prompt(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            messages: vec![ChatMessage::user(prompt)],
            temperature,
        }
    }
}

/// Trait implemented by text-generation backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send the request and return the generated text.
    async fn complete(&self, request: &GenerationRequest) -> Result<String>;

    /// Model identifier sent with every request
    fn model_name(&self) -> &str;
}

mod mistral;

pub use mistral::*;
