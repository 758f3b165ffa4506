//! Vocabulary quiz: question generation and the game state it drives.

pub mod generate;
pub mod state;

pub use generate::{generate_questions, QuizQuestion};
pub use state::{score_message, QuizAction, QuizPhase, QuizSession, QuizView};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("not enough items in this category for a quiz ({found} < 4)")]
    NotEnoughItems { found: usize },
    #[error("quiz has not started")]
    NotStarted,
    #[error("quiz is not in progress ({phase})")]
    NotInProgress { phase: QuizPhase },
    #[error("invalid quiz transition: {from} -> {to}")]
    InvalidTransition { from: QuizPhase, to: QuizPhase },
}
