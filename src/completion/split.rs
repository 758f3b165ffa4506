//! Separation of a raw completion into its Devanagari lead line and the English remainder.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SEGMENT_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n|\n").expect("segment break pattern"));

static DEVANAGARI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{0900}-\x{097F}]").expect("devanagari pattern"));

/// A completion split into source-script and explanation parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitReply {
    pub sanskrit: String,
    #[serde(rename = "english")]
    pub explanation: String,
}

/// Returns true if `text` has any character in the Devanagari block.
pub fn contains_devanagari(text: &str) -> bool {
    DEVANAGARI.is_match(text)
}

/// Split a raw reply. The first segment is taken as Sanskrit only when there is
/// more than one segment and it contains Devanagari; otherwise the whole reply
/// is the explanation, untouched.
pub fn split_reply(raw: &str) -> SplitReply {
    let parts: Vec<&str> = SEGMENT_BREAK.split(raw).collect();
    match parts.split_first() {
        Some((first, rest)) if !rest.is_empty() && contains_devanagari(first) => SplitReply {
            sanskrit: first.trim().to_string(),
            explanation: rest.join("\n").trim().to_string(),
        },
        _ => SplitReply {
            sanskrit: String::new(),
            explanation: raw.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devanagari_first_paragraph() {
        let reply = split_reply("नमस्ते\n\nHello, how are you?");
        assert_eq!(reply.sanskrit, "नमस्ते");
        assert_eq!(reply.explanation, "Hello, how are you?");
    }

    #[test]
    fn plain_english_is_all_explanation() {
        let reply = split_reply("Hello there.");
        assert_eq!(reply.sanskrit, "");
        assert_eq!(reply.explanation, "Hello there.");
    }

    #[test]
    fn single_devanagari_line_is_not_split() {
        let reply = split_reply("नमस्ते");
        assert_eq!(reply.sanskrit, "");
        assert_eq!(reply.explanation, "नमस्ते");
    }

    #[test]
    fn english_first_line_keeps_raw_text() {
        let raw = "Here you go:\nनमस्ते\n";
        let reply = split_reply(raw);
        assert_eq!(reply.sanskrit, "");
        assert_eq!(reply.explanation, raw);
    }

    #[test]
    fn remainder_rejoined_with_single_newlines() {
        let reply = split_reply("  धन्यवादः \nThank you.\n\nUsed to express gratitude.\n");
        assert_eq!(reply.sanskrit, "धन्यवादः");
        assert_eq!(reply.explanation, "Thank you.\nUsed to express gratitude.");
    }
}
