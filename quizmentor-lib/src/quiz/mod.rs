//! Quiz questions, levels and topics
//!
//! A [`Question`] is assembled from generated text by [`parse_question`] and
//! graded by comparing the learner's choice with the stored answer text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Difficulty level
///
/// Serialized with the French labels used in prompts and in the results log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Débutant")]
    Beginner,
    #[serde(rename = "Intermédiaire")]
    Intermediate,
    #[serde(rename = "Expert")]
    Expert,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Expert];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Level::Beginner => "Débutant",
            Level::Intermediate => "Intermédiaire",
            Level::Expert => "Expert",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "débutant" | "debutant" | "beginner" => Ok(Level::Beginner),
            "intermédiaire" | "intermediaire" | "intermediate" => Ok(Level::Intermediate),
            "expert" => Ok(Level::Expert),
            other => Err(Error::InvalidInput(format!("unknown level: {other}"))),
        }
    }
}

/// First-aid subject areas questions are drawn from
pub const TOPICS: [&str; 12] = [
    "hémorragie",
    "obstruction",
    "malaise",
    "arrêt cardiaque",
    "brûlure",
    "traumatisme",
    "intoxication",
    "noyade",
    "électrocution",
    "violence",
    "incendie",
    "urgence scolaire",
];

/// Choice prefixes, in display order
pub const CHOICE_LABELS: [&str; 4] = ["A)", "B)", "C)", "D)"];

/// A generated multiple-choice question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    /// Choices with their label prefix, e.g. `"A) Alerter"`
    pub choices: Vec<String>,
    /// Full text of the correct choice, empty when the parser found none
    pub answer: String,
}

impl Question {
    /// Choice whose label is `label` (`'A'`..=`'D'`, any case)
    #[must_use]
    pub fn choice_for_label(&self, label: char) -> Option<&str> {
        let prefix = format!("{})", label.to_ascii_uppercase());
        self.choices
            .iter()
            .find(|c| c.starts_with(&prefix))
            .map(String::as_str)
    }

    /// Whether `given` is the correct answer.
    ///
    /// Comparison ignores case and surrounding whitespace. A question without a
    /// known answer is never answered correctly.
    #[must_use]
    pub fn is_correct(&self, given: &str) -> bool {
        let expected = self.answer.trim();
        !expected.is_empty() && expected.to_lowercase() == given.trim().to_lowercase()
    }
}

mod assembler;
mod parser;
mod prompt;
mod session;

pub use assembler::*;
pub use parser::*;
pub use prompt::*;
pub use session::*;
