//! Static vocabulary tables grouped by category.
//! Nothing here is created or mutated at runtime; every entry belongs to exactly one category.

pub mod matcher;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A (Devanagari term, English gloss) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entry {
    #[serde(rename = "sanskrit")]
    pub term: &'static str,
    #[serde(rename = "english")]
    pub gloss: &'static str,
}

impl Entry {
    const fn new(term: &'static str, gloss: &'static str) -> Self {
        Self { term, gloss }
    }
}

/// Fixed vocabulary categories, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Greetings,
    Phrases,
    Numbers,
    Days,
    Objects,
    Colors,
    Family,
    Directions,
    Elements,
    Questions,
}

impl Category {
    /// Every category in table order. Matcher tie-breaks depend on this order.
    pub const ALL: [Category; 10] = [
        Category::Greetings,
        Category::Phrases,
        Category::Numbers,
        Category::Days,
        Category::Objects,
        Category::Colors,
        Category::Family,
        Category::Directions,
        Category::Elements,
        Category::Questions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Greetings => "greetings",
            Category::Phrases => "phrases",
            Category::Numbers => "numbers",
            Category::Days => "days",
            Category::Objects => "objects",
            Category::Colors => "colors",
            Category::Family => "family",
            Category::Directions => "directions",
            Category::Elements => "elements",
            Category::Questions => "questions",
        }
    }

    pub fn entries(self) -> &'static [Entry] {
        match self {
            Category::Greetings => GREETINGS,
            Category::Phrases => PHRASES,
            Category::Numbers => NUMBERS,
            Category::Days => DAYS,
            Category::Objects => OBJECTS,
            Category::Colors => COLORS,
            Category::Family => FAMILY,
            Category::Directions => DIRECTIONS,
            Category::Elements => ELEMENTS,
            Category::Questions => QUESTIONS,
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Category> {
        let name = name.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_name(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// All category names in table order.
pub fn categories() -> &'static [Category] {
    &Category::ALL
}

/// Entries for a category name; unknown names yield an empty slice.
pub fn category_items(name: &str) -> &'static [Entry] {
    Category::from_name(name).map(Category::entries).unwrap_or(&[])
}

const GREETINGS: &[Entry] = &[
    Entry::new("नमस्ते", "Hello / Greetings"),
    Entry::new("सुप्रभातम्", "Good morning"),
    Entry::new("शुभसन्ध्या", "Good evening"),
    Entry::new("शुभरात्रिः", "Good night"),
    Entry::new("कथमस्ति भवान्?", "How are you? (for male)"),
    Entry::new("कथमस्ति भवती?", "How are you? (for female)"),
    Entry::new("अहं कुशली", "I am fine (Male)"),
    Entry::new("अहं कुशला", "I am fine (Female)"),
    Entry::new("धन्यवादः", "Thank you"),
    Entry::new("स्वागतम्", "Welcome"),
    Entry::new("क्षम्यताम्", "Sorry / Excuse me"),
];

const PHRASES: &[Entry] = &[
    Entry::new("सर्वं कुशलम्?", "Is everything fine?"),
    Entry::new("कृपया पुनः वदतु।", "Please say again."),
    Entry::new("समीपं आगच्छ।", "Come near."),
    Entry::new("त्वं कुत्र गच्छसि?", "Where are you going?"),
    Entry::new("सः विद्यालयं गच्छति।", "He goes to school."),
    Entry::new("अहम् भोजनं करिष्यामि।", "I will eat food."),
    Entry::new("गच्छतु।", "Please go."),
    Entry::new("स्थितिं कथयतु।", "Tell the status."),
    Entry::new("समझितम्।", "Understood."),
    Entry::new("सर्वं ज्ञातम्।", "Everything is known."),
];

const NUMBERS: &[Entry] = &[
    Entry::new("शून्यः", "0"),
    Entry::new("एकम्", "1"),
    Entry::new("द्वे", "2"),
    Entry::new("त्रीणि", "3"),
    Entry::new("चत्वारि", "4"),
    Entry::new("पञ्च", "5"),
    Entry::new("षट्", "6"),
    Entry::new("सप्त", "7"),
    Entry::new("अष्ट", "8"),
    Entry::new("नव", "9"),
    Entry::new("दश", "10"),
];

const DAYS: &[Entry] = &[
    Entry::new("रविवासरः", "Sunday"),
    Entry::new("सोमवासरः", "Monday"),
    Entry::new("मङ्गलवासरः", "Tuesday"),
    Entry::new("बुधवासरः", "Wednesday"),
    Entry::new("गुरुवासरः", "Thursday"),
    Entry::new("शुक्रवासरः", "Friday"),
    Entry::new("शनिवासरः", "Saturday"),
];

const OBJECTS: &[Entry] = &[
    Entry::new("पुस्तकम्", "Book"),
    Entry::new("लेखनी", "Pen"),
    Entry::new("फलं", "Fruit"),
    Entry::new("जलम्", "Water"),
    Entry::new("गृहम्", "House"),
    Entry::new("छात्रः", "Student (male)"),
    Entry::new("छात्रा", "Student (female)"),
    Entry::new("शिक्षकः", "Teacher (male)"),
    Entry::new("शिक्षिका", "Teacher (female)"),
];

const COLORS: &[Entry] = &[
    Entry::new("श्वेतः", "White"),
    Entry::new("कृष्णः", "Black"),
    Entry::new("पीतः", "Yellow"),
    Entry::new("नीलः", "Blue"),
    Entry::new("रक्तः", "Red"),
    Entry::new("हरितः", "Green"),
];

const FAMILY: &[Entry] = &[
    Entry::new("जनकः", "Father"),
    Entry::new("माता", "Mother"),
    Entry::new("भ्राता", "Brother"),
    Entry::new("भगिनी", "Sister"),
    Entry::new("पुत्रः", "Son"),
    Entry::new("पुत्री", "Daughter"),
    Entry::new("पितामहः", "Grandfather"),
    Entry::new("पितामही", "Grandmother"),
];

const DIRECTIONS: &[Entry] = &[
    Entry::new("उत्तरः", "North"),
    Entry::new("दक्षिणः", "South"),
    Entry::new("पूर्वः", "East"),
    Entry::new("पश्चिमः", "West"),
];

const ELEMENTS: &[Entry] = &[
    Entry::new("भूमिः", "Earth"),
    Entry::new("अपः / जलम्", "Water"),
    Entry::new("तेजः / अग्निः", "Fire"),
    Entry::new("वायुः", "Air"),
    Entry::new("आकाशः", "Sky"),
];

const QUESTIONS: &[Entry] = &[
    Entry::new("किं नाम ते?", "What is your name?"),
    Entry::new("किं कुर्वन्ति भवान् / भवती?", "What do you do?"),
    Entry::new("किं आवश्यकं?", "What is needed?"),
    Entry::new("कस्मिन प्रदेशे गच्छसि?", "Where are you going?"),
    Entry::new("कियद् मूल्यं?", "What is the price?"),
    Entry::new("किमर्थं एवं?", "Why is it so?"),
];
