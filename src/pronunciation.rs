//! Pronunciation guide for a subset of Devanagari letters.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Example {
    pub sanskrit: &'static str,
    pub english: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Guide {
    pub id: u32,
    pub character: &'static str,
    pub transliteration: &'static str,
    pub description: &'static str,
    pub examples: &'static [Example],
}

const fn ex(sanskrit: &'static str, english: &'static str) -> Example {
    Example { sanskrit, english }
}

pub const GUIDES: &[Guide] = &[
    Guide {
        id: 1,
        character: "अ",
        transliteration: "a",
        description: "Short vowel, like \"u\" in \"but\"",
        examples: &[ex("अत्र", "here"), ex("न", "not")],
    },
    Guide {
        id: 2,
        character: "आ",
        transliteration: "ā",
        description: "Long vowel, like \"a\" in \"father\"",
        examples: &[ex("आम्", "yes"), ex("आप:", "water")],
    },
    Guide {
        id: 3,
        character: "इ",
        transliteration: "i",
        description: "Short vowel, like \"i\" in \"pin\"",
        examples: &[ex("इह", "here"), ex("किम्", "what")],
    },
    Guide {
        id: 4,
        character: "ई",
        transliteration: "ī",
        description: "Long vowel, like \"ee\" in \"deep\"",
        examples: &[ex("नदी", "river"), ex("जीवनम्", "life")],
    },
    Guide {
        id: 5,
        character: "उ",
        transliteration: "u",
        description: "Short vowel, like \"u\" in \"push\"",
        examples: &[ex("गुरु", "teacher"), ex("सुखम्", "happiness")],
    },
    Guide {
        id: 6,
        character: "ऊ",
        transliteration: "ū",
        description: "Long vowel, like \"oo\" in \"pool\"",
        examples: &[ex("भू", "earth"), ex("पूर्णम्", "complete")],
    },
    Guide {
        id: 7,
        character: "क",
        transliteration: "ka",
        description: "Unaspirated consonant, like \"k\" in \"skip\"",
        examples: &[ex("कमलम्", "lotus"), ex("लोक:", "world")],
    },
    Guide {
        id: 8,
        character: "ख",
        transliteration: "kha",
        description: "Aspirated consonant, like \"kh\" with strong \"h\"",
        examples: &[ex("खगः", "bird"), ex("मुखम्", "face")],
    },
];

/// Guides whose character contains `query`, or whose transliteration contains it
/// ignoring case. An empty query returns every guide.
pub fn search(query: &str) -> Vec<&'static Guide> {
    if query.is_empty() {
        return GUIDES.iter().collect();
    }
    let lowered = query.to_lowercase();
    GUIDES
        .iter()
        .filter(|g| g.character.contains(query) || g.transliteration.to_lowercase().contains(&lowered))
        .collect()
}

pub fn guide(id: u32) -> Option<&'static Guide> {
    GUIDES.iter().find(|g| g.id == id)
}
