use crate::types::QuizConfig;

/// Points for a correct answer with `remaining` countdown units left
pub fn time_bonus(remaining: u32) -> u32 {
    remaining.div_ceil(2)
}

/// Normalization ceiling for the results bar. Fast answers can beat it.
pub fn max_possible_score(question_count: usize, config: &QuizConfig) -> u32 {
    question_count as u32 * config.points_per_question
}

/// Score as a percentage of the maximum. Not clamped to 100.
pub fn score_percentage(score: u32, max_score: u32) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(max_score) * 100.0
}

/// Final numbers for the results screen
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub score: u32,
    pub max_score: u32,
    pub percentage: f64,
}

impl QuizResults {
    pub fn new(score: u32, question_count: usize, config: &QuizConfig) -> Self {
        let max_score = max_possible_score(question_count, config);
        Self {
            score,
            max_score,
            percentage: score_percentage(score, max_score),
        }
    }
}
