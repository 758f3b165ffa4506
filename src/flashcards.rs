//! Flashcard deck projected from the vocabulary table.

use serde::Serialize;

use crate::vocab::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flashcard {
    pub id: u32,
    pub sanskrit: &'static str,
    pub english: &'static str,
    pub category: Category,
}

/// Cards for one category, or every category when `filter` is None.
/// Ids follow table order starting at 1 and are stable across filters.
pub fn project(filter: Option<Category>) -> Vec<Flashcard> {
    Category::ALL
        .into_iter()
        .flat_map(|category| category.entries().iter().map(move |e| (category, e)))
        .zip(1u32..)
        .filter(|((category, _), _)| filter.map_or(true, |f| f == *category))
        .map(|((category, entry), id)| Flashcard {
            id,
            sanskrit: entry.term,
            english: entry.gloss,
            category,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckAction {
    Select(Option<Category>),
    Flip,
    Next,
    Prev,
    Reset,
}

#[derive(Debug, Clone)]
pub struct Deck {
    filter: Option<Category>,
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
}

impl Deck {
    pub fn new(filter: Option<Category>) -> Self {
        Self {
            filter,
            cards: project(filter),
            index: 0,
            flipped: false,
        }
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    pub fn apply(&mut self, action: DeckAction) {
        let n = self.cards.len();
        match action {
            DeckAction::Select(filter) => {
                *self = Deck::new(filter);
            }
            DeckAction::Flip => {
                if n > 0 {
                    self.flipped = !self.flipped;
                }
            }
            DeckAction::Next if n > 0 => {
                self.flipped = false;
                self.index = (self.index + 1) % n;
            }
            DeckAction::Prev if n > 0 => {
                self.flipped = false;
                self.index = (self.index + n - 1) % n;
            }
            DeckAction::Reset => {
                self.flipped = false;
                self.index = 0;
            }
            DeckAction::Next | DeckAction::Prev => {}
        }
    }

    pub fn view(&self) -> DeckView {
        DeckView {
            category: self.filter,
            index: self.index,
            total: self.cards.len(),
            flipped: self.flipped,
            card: self.current().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeckView {
    /// None means all categories.
    pub category: Option<Category>,
    pub index: usize,
    pub total: usize,
    pub flipped: bool,
    pub card: Option<Flashcard>,
}
