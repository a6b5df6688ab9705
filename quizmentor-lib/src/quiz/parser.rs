use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::quiz::{Question, CHOICE_LABELS};

/// Phrases that introduce the correct-answer line
const ANSWER_MARKERS: [&str; 2] = ["Bonne réponse", "Réponse"];

/// Something the generated text lacked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseGap {
    /// Nothing but whitespace came back
    EmptyResponse,
    /// No line contains `?`; the first line was used as the question
    NoQuestionMark,
    /// No `A)`..`D)` line
    NoChoices,
    /// Choices were found, but not four of them
    UnexpectedChoiceCount(usize),
    /// No line mentions the correct answer
    NoAnswerLine,
    /// The answer line has no `X)` label
    NoAnswerLabel,
    /// The answer label matches none of the choices
    AnswerNotInChoices,
}

impl fmt::Display for ParseGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseGap::EmptyResponse => f.write_str("empty response"),
            ParseGap::NoQuestionMark => f.write_str("no line with a question mark"),
            ParseGap::NoChoices => f.write_str("no labelled choices"),
            ParseGap::UnexpectedChoiceCount(n) => write!(f, "{n} choices instead of 4"),
            ParseGap::NoAnswerLine => f.write_str("no correct-answer line"),
            ParseGap::NoAnswerLabel => f.write_str("correct-answer line has no label"),
            ParseGap::AnswerNotInChoices => f.write_str("answer label matches no choice"),
        }
    }
}

/// Parser output: the question plus what had to be defaulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    pub question: Question,
    pub gaps: Vec<ParseGap>,
}

impl ParsedQuestion {
    /// True when the text matched the expected layout exactly
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

fn answer_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-D]\))\s*(.+)").expect("valid answer label pattern"))
}

/// Parse generated text into a question.
///
/// Expected layout, one item per line: the question (containing `?`), four
/// choices prefixed `A)` to `D)`, then `Bonne réponse : X) Texte complet`.
/// Missing pieces fall back to defaults and are listed in
/// [`ParsedQuestion::gaps`]; this never fails.
#[must_use]
pub fn parse_question(raw: &str) -> ParsedQuestion {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut gaps = Vec::new();
    if lines.is_empty() {
        gaps.push(ParseGap::EmptyResponse);
    }

    let question = match lines.iter().find(|l| l.contains('?')) {
        Some(line) => line.to_string(),
        None => {
            if !lines.is_empty() {
                gaps.push(ParseGap::NoQuestionMark);
            }
            lines.first().map(|l| l.to_string()).unwrap_or_default()
        }
    };

    let choices: Vec<String> = lines
        .iter()
        .filter(|l| CHOICE_LABELS.iter().any(|label| l.starts_with(label)))
        .map(|l| l.to_string())
        .collect();
    match choices.len() {
        0 => gaps.push(ParseGap::NoChoices),
        4 => {}
        n => gaps.push(ParseGap::UnexpectedChoiceCount(n)),
    }

    let answer_line = lines
        .iter()
        .find(|l| ANSWER_MARKERS.iter().any(|m| l.contains(m)))
        .copied()
        .unwrap_or("");

    let answer = if answer_line.is_empty() {
        gaps.push(ParseGap::NoAnswerLine);
        String::new()
    } else {
        match answer_label().captures(answer_line).and_then(|c| c.get(1)) {
            Some(label) => match choices.iter().find(|c| c.starts_with(label.as_str())) {
                Some(choice) => choice.clone(),
                None => {
                    gaps.push(ParseGap::AnswerNotInChoices);
                    String::new()
                }
            },
            None => {
                gaps.push(ParseGap::NoAnswerLabel);
                String::new()
            }
        }
    };

    ParsedQuestion {
        question: Question {
            question,
            choices,
            answer,
        },
        gaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
Question : Une personne saigne abondamment du bras. Que faites-vous en premier ?

A) Je lui donne à boire
B) J'appuie fortement sur la plaie
C) Je la fais marcher
D) J'attends les secours sans agir

Bonne réponse : B) J'appuie fortement sur la plaie
";

    #[test]
    fn test_well_formed() {
        let parsed = parse_question(WELL_FORMED);

        assert!(parsed.is_complete(), "gaps: {:?}", parsed.gaps);
        assert_eq!(
            parsed.question.question,
            "Question : Une personne saigne abondamment du bras. Que faites-vous en premier ?"
        );
        assert_eq!(parsed.question.choices.len(), 4);
        assert_eq!(parsed.question.choices[0], "A) Je lui donne à boire");
        assert_eq!(parsed.question.answer, "B) J'appuie fortement sur la plaie");
    }

    #[test]
    fn test_question_defaults_to_first_line() {
        let parsed = parse_question("Bonjour.\nA) x\nB) y");

        assert_eq!(parsed.question.question, "Bonjour.");
        assert_eq!(parsed.question.choices, vec!["A) x", "B) y"]);
        assert!(parsed.gaps.contains(&ParseGap::NoQuestionMark));
        assert!(parsed.gaps.contains(&ParseGap::UnexpectedChoiceCount(2)));
    }

    #[test]
    fn test_answer_resolves_to_full_choice() {
        let raw = "Quoi ?\nA) Autre\nB) Texte complet\nBonne réponse : B) Texte complet";
        let parsed = parse_question(raw);

        assert_eq!(parsed.question.answer, "B) Texte complet");
    }

    #[test]
    fn test_answer_uses_choice_text_not_answer_line() {
        let raw = "Quoi ?\nA) Comprimer la plaie\nRéponse : A) comprimer";
        let parsed = parse_question(raw);

        assert_eq!(parsed.question.answer, "A) Comprimer la plaie");
    }

    #[test]
    fn test_no_answer_line() {
        let parsed = parse_question("Quoi ?\nA) x\nB) y\nC) z\nD) w");

        assert_eq!(parsed.question.answer, "");
        assert_eq!(parsed.gaps, vec![ParseGap::NoAnswerLine]);
    }

    #[test]
    fn test_answer_line_without_label() {
        let parsed = parse_question("Quoi ?\nA) x\nBonne réponse : la compression");

        assert_eq!(parsed.question.answer, "");
        assert!(parsed.gaps.contains(&ParseGap::NoAnswerLabel));
    }

    #[test]
    fn test_answer_label_not_among_choices() {
        let parsed = parse_question("Quoi ?\nA) x\nB) y\nBonne réponse : D) w");

        assert_eq!(parsed.question.answer, "");
        assert!(parsed.gaps.contains(&ParseGap::AnswerNotInChoices));
    }

    #[test]
    fn test_empty_response() {
        let parsed = parse_question("  \n\n ");

        assert_eq!(parsed.question, Question::default());
        assert_eq!(
            parsed.gaps,
            vec![ParseGap::EmptyResponse, ParseGap::NoChoices, ParseGap::NoAnswerLine]
        );
    }

    #[test]
    fn test_lines_are_trimmed() {
        let parsed = parse_question("   Pourquoi ?  \n   A) a  \n");

        assert_eq!(parsed.question.question, "Pourquoi ?");
        assert_eq!(parsed.question.choices, vec!["A) a"]);
    }
}
