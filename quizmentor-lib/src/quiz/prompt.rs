use crate::quiz::Level;

/// Level-specific instruction line added to every prompt
#[must_use]
pub fn level_instruction(level: Level) -> &'static str {
    match level {
        Level::Beginner => "- 1 QCM niveau débutant avec 4 choix dont UNE seule bonne réponse.",
        Level::Intermediate => {
            "- 1 situation réelle où il faut faire un choix (niveau intermédiaire)."
        }
        Level::Expert => "- 1 cas complexe pour niveau expert avec plusieurs étapes à résoudre.",
    }
}

/// Retrieval query for a level and topic
#[must_use]
pub fn retrieval_query(level: Level, topic: &str) -> String {
    format!("Crée une question niveau {level} sur les gestes de secours liés à {topic}")
}

/// Generation prompt asking for exactly one four-choice question.
///
/// The final-line format (`Bonne réponse : X) Texte complet`) is what
/// [`parse_question`](crate::quiz::parse_question) looks for.
#[must_use]
pub fn question_prompt(level: Level, topic: &str, context: &str) -> String {
    format!(
        "Tu es un formateur expert de la Croix-Rouge française, spécialisé en premiers secours.

Ta mission est de créer une question d'évaluation claire et précise sur les gestes de secours.

Voici les consignes à suivre :
- Thème : {topic}
- Niveau : {level}
{instruction}
- Formule UNE seule question QCM avec 4 choix A) B) C) D), un choix par ligne.
- Une seule bonne réponse.
- Les autres propositions doivent être plausibles.
- Termine par : Bonne réponse : X) Texte complet

Contexte d'appui :
{context}
",
        instruction = level_instruction(level),
    )
}
