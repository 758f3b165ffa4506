//! Quiz game state: Setup → InProgress → Finished, driven by `QuizAction`s.
//! Every change goes through `QuizSession::apply`.

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use super::generate::{generate_questions, QuizQuestion};
use super::QuizError;
use crate::notify::Notice;
use crate::vocab::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    Setup,
    InProgress,
    Finished,
}

impl std::fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizPhase::Setup => write!(f, "Setup"),
            QuizPhase::InProgress => write!(f, "InProgress"),
            QuizPhase::Finished => write!(f, "Finished"),
        }
    }
}

impl QuizPhase {
    /// Returns whether moving from `self` to `next` is valid.
    pub fn can_transition_to(self, next: QuizPhase) -> bool {
        matches!(
            (self, next),
            (QuizPhase::Setup, QuizPhase::InProgress)
                | (QuizPhase::InProgress, QuizPhase::Finished)
                | (QuizPhase::InProgress, QuizPhase::InProgress) // restart mid-round
                | (QuizPhase::Finished, QuizPhase::InProgress) // play again
                | (QuizPhase::InProgress, QuizPhase::Setup) // choose another category
                | (QuizPhase::Finished, QuizPhase::Setup)
        )
    }
}

#[derive(Debug, Clone)]
pub enum QuizAction {
    Start(Category),
    Answer(String),
    Advance,
    Restart,
    ChooseCategory,
}

/// One player's quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    category: Category,
    phase: QuizPhase,
    questions: Vec<QuizQuestion>,
    current: usize,
    score: u32,
}

impl QuizSession {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            phase: QuizPhase::Setup,
            questions: Vec::new(),
            current: 0,
            score: 0,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::InProgress => self.questions.get(self.current),
            _ => None,
        }
    }

    /// Apply an action. A notice is returned when the player should see one.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        action: QuizAction,
        rng: &mut R,
    ) -> Result<Option<Notice>, QuizError> {
        match action {
            QuizAction::Start(category) => {
                self.category = category;
                self.begin_round(rng)?;
                Ok(None)
            }
            QuizAction::Restart => {
                if self.phase == QuizPhase::Setup {
                    return Err(QuizError::NotStarted);
                }
                self.begin_round(rng)?;
                Ok(None)
            }
            QuizAction::Answer(option) => self.answer(&option),
            QuizAction::Advance => {
                self.advance()?;
                Ok((self.phase == QuizPhase::Finished)
                    .then(|| Notice::info(score_message(self.score, self.questions.len()))))
            }
            QuizAction::ChooseCategory => {
                self.transition(QuizPhase::Setup)?;
                self.questions.clear();
                self.current = 0;
                self.score = 0;
                Ok(None)
            }
        }
    }

    fn transition(&mut self, next: QuizPhase) -> Result<(), QuizError> {
        if !self.phase.can_transition_to(next) {
            warn!(from = %self.phase, to = %next, "invalid quiz transition");
            return Err(QuizError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        info!(from = %self.phase, to = %next, category = %self.category, "quiz_transition");
        self.phase = next;
        Ok(())
    }

    fn begin_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        if !self.phase.can_transition_to(QuizPhase::InProgress) {
            return Err(QuizError::InvalidTransition {
                from: self.phase,
                to: QuizPhase::InProgress,
            });
        }
        // Generate first so a too-small category leaves the game where it was.
        let questions = generate_questions(self.category.entries(), rng)?;
        self.transition(QuizPhase::InProgress)?;
        self.questions = questions;
        self.current = 0;
        self.score = 0;
        Ok(())
    }

    fn ensure_in_progress(&self) -> Result<(), QuizError> {
        if self.phase == QuizPhase::InProgress {
            Ok(())
        } else {
            Err(QuizError::NotInProgress { phase: self.phase })
        }
    }

    /// A second answer to the same question is ignored.
    fn answer(&mut self, option: &str) -> Result<Option<Notice>, QuizError> {
        self.ensure_in_progress()?;
        let Some(question) = self.questions.get_mut(self.current) else {
            return Ok(None);
        };
        if question.answered {
            return Ok(None);
        }
        let correct = option == question.english;
        question.answered = true;
        question.correct = correct;
        let notice = if correct {
            self.score += 1;
            Notice::success("Correct answer!")
        } else {
            Notice::error(format!("Incorrect. The answer is: {}", question.english))
        };
        Ok(Some(notice))
    }

    /// Move past an answered question; the last one finishes the round.
    fn advance(&mut self) -> Result<(), QuizError> {
        self.ensure_in_progress()?;
        let answered = self
            .current_question()
            .map(|q| q.answered)
            .unwrap_or(false);
        if !answered {
            return Ok(());
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(())
        } else {
            self.transition(QuizPhase::Finished)
        }
    }

    /// Snapshot for display. The correct answer is only revealed once answered.
    pub fn view(&self) -> QuizView {
        let question = self.current_question().map(|q| QuestionView {
            sanskrit: q.sanskrit.clone(),
            options: q.options.clone(),
            answered: q.answered,
            correct: q.answered.then_some(q.correct),
            answer: q.answered.then(|| q.english.clone()),
        });
        let total = self.questions.len();
        QuizView {
            phase: self.phase,
            category: self.category,
            index: self.current,
            total,
            score: self.score,
            question,
            message: (self.phase == QuizPhase::Finished)
                .then(|| score_message(self.score, total).to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub sanskrit: String,
    pub options: Vec<String>,
    pub answered: bool,
    pub correct: Option<bool>,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub phase: QuizPhase,
    pub category: Category,
    pub index: usize,
    pub total: usize,
    pub score: u32,
    pub question: Option<QuestionView>,
    pub message: Option<String>,
}

/// End-of-round message by percentage correct.
pub fn score_message(score: u32, total: usize) -> &'static str {
    if total == 0 {
        return "Keep learning! You'll improve with practice!";
    }
    let percentage = score as f64 / total as f64 * 100.0;
    if percentage >= 100.0 {
        "Perfect! You're a Sanskrit master!"
    } else if percentage >= 80.0 {
        "Great job! You know your Sanskrit well!"
    } else if percentage >= 60.0 {
        "Good effort! Keep practicing!"
    } else if percentage >= 40.0 {
        "Not bad! More practice will help!"
    } else {
        "Keep learning! You'll improve with practice!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started(category: Category) -> (QuizSession, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let mut quiz = QuizSession::new(category);
        quiz.apply(QuizAction::Start(category), &mut rng).unwrap();
        (quiz, rng)
    }

    #[test]
    fn transitions() {
        assert!(QuizPhase::Setup.can_transition_to(QuizPhase::InProgress));
        assert!(!QuizPhase::Setup.can_transition_to(QuizPhase::Finished));
        assert!(QuizPhase::Finished.can_transition_to(QuizPhase::InProgress));
    }

    #[test]
    fn full_round_all_correct() {
        let (mut quiz, mut rng) = started(Category::Colors);
        assert_eq!(quiz.phase(), QuizPhase::InProgress);
        while quiz.phase() == QuizPhase::InProgress {
            let answer = quiz.current_question().unwrap().english.clone();
            let notice = quiz.apply(QuizAction::Answer(answer), &mut rng).unwrap();
            assert_eq!(notice.unwrap().level, NoticeLevel::Success);
            let after = quiz.apply(QuizAction::Advance, &mut rng).unwrap();
            if quiz.phase() == QuizPhase::Finished {
                assert_eq!(after.unwrap().level, NoticeLevel::Info);
            } else {
                assert!(after.is_none());
            }
        }
        assert_eq!(quiz.phase(), QuizPhase::Finished);
        assert_eq!(quiz.score(), 5);
        assert_eq!(
            quiz.view().message.as_deref(),
            Some("Perfect! You're a Sanskrit master!")
        );
    }

    #[test]
    fn wrong_answer_reveals_gloss_and_second_answer_is_ignored() {
        let (mut quiz, mut rng) = started(Category::Family);
        let q = quiz.current_question().unwrap().clone();
        let wrong = q.options.iter().find(|o| **o != q.english).unwrap().clone();

        let notice = quiz.apply(QuizAction::Answer(wrong), &mut rng).unwrap().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, format!("Incorrect. The answer is: {}", q.english));

        let again = quiz.apply(QuizAction::Answer(q.english.clone()), &mut rng).unwrap();
        assert!(again.is_none());
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.view().question.unwrap().correct, Some(false));
    }

    #[test]
    fn advance_requires_an_answer() {
        let (mut quiz, mut rng) = started(Category::Days);
        quiz.apply(QuizAction::Advance, &mut rng).unwrap();
        assert_eq!(quiz.view().index, 0);
        assert!(quiz.view().question.unwrap().answer.is_none());
    }

    #[test]
    fn choose_category_returns_to_setup() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut quiz = QuizSession::new(Category::Directions);
        assert!(quiz.apply(QuizAction::Start(Category::Directions), &mut rng).is_ok());
        quiz.apply(QuizAction::ChooseCategory, &mut rng).unwrap();
        assert_eq!(quiz.phase(), QuizPhase::Setup);
        assert!(quiz.questions().is_empty());
    }

    #[test]
    fn restart_resets_score() {
        let (mut quiz, mut rng) = started(Category::Greetings);
        let answer = quiz.current_question().unwrap().english.clone();
        quiz.apply(QuizAction::Answer(answer), &mut rng).unwrap();
        assert_eq!(quiz.score(), 1);
        quiz.apply(QuizAction::Restart, &mut rng).unwrap();
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.view().index, 0);
    }

    #[test]
    fn restart_from_setup_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut quiz = QuizSession::new(Category::Colors);
        let err = quiz.apply(QuizAction::Restart, &mut rng).unwrap_err();
        assert_eq!(err, QuizError::NotStarted);
        assert_eq!(quiz.phase(), QuizPhase::Setup);
    }

    #[test]
    fn answer_and_advance_need_a_running_round() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut quiz = QuizSession::new(Category::Colors);
        let err = quiz
            .apply(QuizAction::Answer("White".into()), &mut rng)
            .unwrap_err();
        assert_eq!(err, QuizError::NotInProgress { phase: QuizPhase::Setup });
        let err = quiz.apply(QuizAction::Advance, &mut rng).unwrap_err();
        assert_eq!(err, QuizError::NotInProgress { phase: QuizPhase::Setup });

        let (mut quiz, mut rng) = started(Category::Colors);
        while quiz.phase() == QuizPhase::InProgress {
            let answer = quiz.current_question().unwrap().english.clone();
            quiz.apply(QuizAction::Answer(answer), &mut rng).unwrap();
            quiz.apply(QuizAction::Advance, &mut rng).unwrap();
        }
        let err = quiz.apply(QuizAction::Advance, &mut rng).unwrap_err();
        assert_eq!(err, QuizError::NotInProgress { phase: QuizPhase::Finished });
        assert!(quiz
            .apply(QuizAction::Answer("White".into()), &mut rng)
            .is_err());
        assert_eq!(quiz.score(), 5);
    }

    #[test]
    fn score_messages() {
        assert_eq!(score_message(4, 5), "Great job! You know your Sanskrit well!");
        assert_eq!(score_message(3, 5), "Good effort! Keep practicing!");
        assert_eq!(score_message(2, 5), "Not bad! More practice will help!");
        assert_eq!(score_message(1, 5), "Keep learning! You'll improve with practice!");
        assert_eq!(score_message(0, 0), "Keep learning! You'll improve with practice!");
    }
}
