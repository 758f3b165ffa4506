//! Keyword-overlap matching of a free-text query against the vocabulary categories.
//! The winning category seeds the tutor's system prompt.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::{Category, Entry};

const NAME_HIT: u32 = 5;
const GLOSS_HIT: u32 = 3;
const KEYWORD_HIT: u32 = 1;
/// Gloss tokens must be longer than this many characters to count.
const MIN_KEYWORD_LEN: usize = 2;

/// Best-guess category for a query, with its full entry list.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryMatch {
    pub category: Category,
    pub entries: &'static [Entry],
    /// Zero when the category was picked at random.
    pub score: u32,
}

/// Score every category against `query`, in table order.
pub fn score_categories(query: &str) -> Vec<(Category, u32)> {
    let query = query.to_lowercase();
    Category::ALL
        .into_iter()
        .map(|category| (category, score_category(category, &query)))
        .collect()
}

fn score_category(category: Category, query: &str) -> u32 {
    let mut score = 0;
    if query.contains(category.name()) {
        score += NAME_HIT;
    }
    for entry in category.entries() {
        let gloss = entry.gloss.to_lowercase();
        if gloss.contains(query) || query.contains(gloss.as_str()) {
            score += GLOSS_HIT;
        }
        score += gloss_keywords(&gloss)
            .filter(|kw| query.contains(kw))
            .count() as u32
            * KEYWORD_HIT;
    }
    score
}

/// Tokens of a lower-cased gloss split on anything outside `[a-z0-9]`.
fn gloss_keywords(gloss: &str) -> impl Iterator<Item = &str> {
    gloss
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|kw| kw.len() > MIN_KEYWORD_LEN)
}

/// Pick the highest-scoring category. Ties go to the earlier category;
/// when nothing scores, a category is drawn uniformly from `rng`.
pub fn match_category<R: Rng + ?Sized>(query: &str, rng: &mut R) -> CategoryMatch {
    let mut best: Option<(Category, u32)> = None;
    for (category, score) in score_categories(query) {
        let best_score = best.map(|(_, s)| s).unwrap_or(0);
        if score > best_score {
            best = Some((category, score));
        }
    }

    let (category, score) = match best {
        Some(hit) => hit,
        None => {
            let pick = Category::ALL[rng.random_range(0..Category::ALL.len())];
            debug!(category = %pick, "no category matched, picked at random");
            (pick, 0)
        }
    };

    CategoryMatch {
        category,
        entries: category.entries(),
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn score_of(query: &str, category: Category) -> u32 {
        score_categories(query)
            .into_iter()
            .find(|(c, _)| *c == category)
            .map(|(_, s)| s)
            .unwrap()
    }

    #[test]
    fn greetings_query_selects_greetings() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = match_category("Teach me some greetings", &mut rng);
        assert_eq!(m.category, Category::Greetings);
        assert_eq!(m.entries.len(), 11);
        assert!(m.score >= NAME_HIT);
    }

    #[test]
    fn category_name_adds_five() {
        for category in Category::ALL {
            let query = format!("tell me about {}", category.name().to_uppercase());
            assert!(score_of(&query, category) >= NAME_HIT, "{category}");
        }
    }

    #[test]
    fn whole_gloss_and_keywords_accumulate() {
        // "monday" is a whole gloss (+3) and a keyword (+1)
        assert_eq!(score_of("monday", Category::Days), 4);
        // query inside a gloss: "sun" is contained by "sunday"
        assert_eq!(score_of("sun", Category::Days), 3);
    }

    #[test]
    fn unrelated_categories_score_zero() {
        let scores = score_categories("what is the colour of the sky");
        for (category, score) in scores {
            match category {
                Category::Elements | Category::Questions | Category::Phrases => {}
                other => assert_eq!(score, 0, "{other}"),
            }
        }
        assert_eq!(score_of("xyzzy", Category::Numbers), 0);
    }

    #[test]
    fn tie_goes_to_first_category() {
        // "water" hits objects and elements equally; objects comes first
        assert_eq!(score_of("water", Category::Objects), score_of("water", Category::Elements));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(match_category("water", &mut rng).category, Category::Objects);
    }

    #[test]
    fn zero_scores_fall_back_to_some_category() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let m = match_category("xyzzy", &mut rng);
            assert_eq!(m.score, 0);
            assert!(!m.entries.is_empty());
            assert_eq!(m.entries, m.category.entries());
        }
    }

    #[test]
    fn short_tokens_are_ignored() {
        // "am" from "I am fine" is too short to count
        assert_eq!(score_of("am", Category::Greetings), 2 * GLOSS_HIT);
    }

    #[test]
    fn empty_query_favours_the_largest_early_category() {
        let m = match_category("", &mut StdRng::seed_from_u64(3));
        assert_eq!(m.category, Category::Greetings);
        assert_eq!(m.score, 11 * GLOSS_HIT);
    }
}
