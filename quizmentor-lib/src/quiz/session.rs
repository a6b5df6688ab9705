use chrono::{Local, NaiveDateTime};

use crate::quiz::{Level, Question};
use crate::results::{AnswerRecord, SessionRecord};

/// Result of answering one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub correct: bool,
    /// Expected answer text, empty when it was never known
    pub correct_answer: String,
}

/// A learner working through a list of questions
#[derive(Debug, Clone)]
pub struct QuizSession {
    level: Level,
    questions: Vec<Question>,
    answers: Vec<AnswerRecord>,
    score: u32,
}

impl QuizSession {
    #[must_use]
    pub fn new(level: Level, questions: Vec<Question>) -> Self {
        Self {
            level,
            questions,
            answers: Vec::new(),
            score: 0,
        }
    }

    /// Question waiting for an answer, `None` once finished
    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.answers.len())
    }

    /// 0-based index of the current question
    #[must_use]
    pub fn position(&self) -> usize {
        self.answers.len()
    }

    /// Record an answer to the current question.
    ///
    /// Returns `None` when every question has already been answered.
    pub fn answer(&mut self, given: &str) -> Option<Outcome> {
        let question = self.current()?;
        let correct = question.is_correct(given);
        let record = AnswerRecord {
            question: question.question.clone(),
            choices: question.choices.clone(),
            user_answer: given.to_string(),
            correct_answer: question.answer.clone(),
        };
        let outcome = Outcome {
            correct,
            correct_answer: record.correct_answer.clone(),
        };

        if correct {
            self.score += 1;
        }
        self.answers.push(record);
        Some(outcome)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.answers.len() >= self.questions.len()
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    /// Session record stamped with `timestamp`
    #[must_use]
    pub fn into_record(self, timestamp: NaiveDateTime) -> SessionRecord {
        SessionRecord {
            level: self.level,
            score: self.score,
            total: self.total(),
            answers: self.answers,
            timestamp,
        }
    }

    /// Session record stamped with the local time
    #[must_use]
    pub fn into_record_now(self) -> SessionRecord {
        self.into_record(Local::now().naive_local())
    }
}
