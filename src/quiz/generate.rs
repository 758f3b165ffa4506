//! Multiple-choice question generation from a category's entries.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::QuizError;
use crate::vocab::Entry;

/// Categories smaller than this cannot supply three distractors.
pub const MIN_ENTRIES: usize = 4;
/// Only the first entries of a category become questions.
pub const MAX_SOURCE_ENTRIES: usize = 10;
pub const DISTRACTORS: usize = 3;
pub const ROUND_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    pub sanskrit: String,
    pub english: String,
    pub options: Vec<String>,
    pub answered: bool,
    pub correct: bool,
}

/// Build a shuffled round of up to five questions.
pub fn generate_questions<R: Rng + ?Sized>(
    entries: &[Entry],
    rng: &mut R,
) -> Result<Vec<QuizQuestion>, QuizError> {
    if entries.len() < MIN_ENTRIES {
        return Err(QuizError::NotEnoughItems {
            found: entries.len(),
        });
    }

    let mut questions: Vec<QuizQuestion> = entries
        .iter()
        .take(MAX_SOURCE_ENTRIES)
        .map(|entry| {
            let mut others: Vec<&str> = entries
                .iter()
                .filter(|other| other.gloss != entry.gloss)
                .map(|other| other.gloss)
                .collect();
            others.shuffle(rng);

            let mut options: Vec<String> = others
                .into_iter()
                .take(DISTRACTORS)
                .map(str::to_string)
                .collect();
            options.push(entry.gloss.to_string());
            options.shuffle(rng);

            QuizQuestion {
                sanskrit: entry.term.to_string(),
                english: entry.gloss.to_string(),
                options,
                answered: false,
                correct: false,
            }
        })
        .collect();

    questions.shuffle(rng);
    questions.truncate(ROUND_LENGTH);
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Category;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn four_entries_are_enough() {
        let mut rng = StdRng::seed_from_u64(3);
        let questions = generate_questions(Category::Directions.entries(), &mut rng).unwrap();
        assert_eq!(questions.len(), 4);
        for q in &questions {
            assert_eq!(q.options.len(), 4);
            assert!(q.options.contains(&q.english));
        }
    }

    #[test]
    fn three_entries_are_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let entries = &Category::Directions.entries()[..3];
        assert_eq!(
            generate_questions(entries, &mut rng),
            Err(QuizError::NotEnoughItems { found: 3 })
        );
    }

    #[test]
    fn round_is_five_distinct_questions_with_distinct_options() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let questions = generate_questions(Category::Greetings.entries(), &mut rng).unwrap();
            assert_eq!(questions.len(), ROUND_LENGTH);

            let mut terms: Vec<&str> = questions.iter().map(|q| q.sanskrit.as_str()).collect();
            terms.sort();
            terms.dedup();
            assert_eq!(terms.len(), ROUND_LENGTH);

            for q in &questions {
                let mut opts = q.options.clone();
                opts.sort();
                opts.dedup();
                assert_eq!(opts.len(), 4, "{:?}", q.options);
                assert_eq!(q.options.iter().filter(|o| **o == q.english).count(), 1);
            }
        }
    }

    #[test]
    fn only_first_ten_entries_are_asked() {
        // numbers has 11 entries; "10" (the eleventh) is never a question
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let questions = generate_questions(Category::Numbers.entries(), &mut rng).unwrap();
            assert!(questions.iter().all(|q| q.english != "10"));
        }
    }
}
