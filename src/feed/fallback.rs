use crate::types::{OptionId, Question, QuizOption};

/// Prompt, options and the correct option's text
const FALLBACK_DATA: [(&str, [&str; 4], &str); 5] = [
    (
        "What is the capital of France?",
        ["Paris", "London", "Berlin", "Madrid"],
        "Paris",
    ),
    (
        "Which planet is known as the Red Planet?",
        ["Mars", "Venus", "Jupiter", "Saturn"],
        "Mars",
    ),
    (
        "What is the largest mammal in the world?",
        ["Blue Whale", "African Elephant", "Giraffe", "Polar Bear"],
        "Blue Whale",
    ),
    (
        "Who painted the Mona Lisa?",
        [
            "Leonardo da Vinci",
            "Vincent van Gogh",
            "Pablo Picasso",
            "Michelangelo",
        ],
        "Leonardo da Vinci",
    ),
    (
        "What is the chemical symbol for gold?",
        ["Au", "Ag", "Fe", "Cu"],
        "Au",
    ),
];

/// Built-in question set used when the feed is unavailable.
///
/// The answer text is resolved into the per-option flag here, so fallback
/// questions are scored by option id like feed questions.
pub fn fallback_questions() -> Vec<Question> {
    FALLBACK_DATA
        .iter()
        .map(|(prompt, options, answer)| Question {
            prompt: prompt.to_string(),
            options: options
                .iter()
                .enumerate()
                .map(|(i, text)| QuizOption {
                    id: (i + 1) as OptionId,
                    text: text.to_string(),
                    is_correct: text == answer,
                })
                .collect(),
            explanation: answer.to_string(),
        })
        .collect()
}
