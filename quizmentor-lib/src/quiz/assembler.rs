use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::embed::Embedder;
use crate::generate::{GenerationRequest, Generator};
use crate::quiz::{
    parse_question, question_prompt, retrieval_query, Level, ParseGap, Question, TOPICS,
};
use crate::retrieve::Retriever;
use crate::Result;

/// Chunks retrieved as context for each question
pub const CONTEXT_CHUNKS: usize = 5;

/// A question together with how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuestion {
    pub topic: &'static str,
    pub question: Question,
    /// Parser fallbacks applied to the generated text
    pub gaps: Vec<ParseGap>,
}

/// Builds quiz questions: topic → retrieval → prompt → generation → parse.
pub struct QuizAssembler<E: Embedder, G: Generator> {
    retriever: Retriever<E>,
    generator: G,
    temperature: f32,
    rng: StdRng,
}

impl<E: Embedder, G: Generator> QuizAssembler<E, G> {
    #[must_use]
    pub fn new(retriever: Retriever<E>, generator: G) -> Self {
        Self {
            retriever,
            generator,
            temperature: 0.7,
            rng: StdRng::from_entropy(),
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Use a fixed topic sequence
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Generate `count` questions for `level`.
    ///
    /// Questions whose text did not parse cleanly are still returned, with
    /// their gaps logged. A generation or retrieval failure aborts the batch.
    pub async fn generate(
        &mut self,
        level: Level,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>> {
        info!(%level, count, model = self.generator.model_name(), "generating quiz");

        let mut questions = Vec::with_capacity(count);
        for _ in 0..count {
            questions.push(self.generate_one(level).await?);
        }
        Ok(questions)
    }

    /// Generate a single question on a random topic.
    pub async fn generate_one(&mut self, level: Level) -> Result<GeneratedQuestion> {
        let topic = TOPICS.choose(&mut self.rng).copied().unwrap_or(TOPICS[0]);
        self.generate_on_topic(level, topic).await
    }

    async fn generate_on_topic(
        &mut self,
        level: Level,
        topic: &'static str,
    ) -> Result<GeneratedQuestion> {
        let query = retrieval_query(level, topic);
        let context = self.retriever.retrieve(&query, CONTEXT_CHUNKS)?.join("\n");
        debug!(topic, context_chars = context.chars().count(), "context retrieved");

        let prompt = question_prompt(level, topic, &context);
        let raw = self
            .generator
            .complete(&GenerationRequest::prompt(prompt, self.temperature))
            .await?;

        let parsed = parse_question(&raw);
        for gap in &parsed.gaps {
            warn!(topic, %gap, "generated question did not match the expected layout");
        }

        Ok(GeneratedQuestion {
            topic,
            question: parsed.question,
            gaps: parsed.gaps,
        })
    }

    /// Returns a reference to the retriever.
    #[must_use]
    pub fn retriever(&self) -> &Retriever<E> {
        &self.retriever
    }
}
