//! Speech playback through the host's text-to-speech facility.
//! `Speaker` is the injectable capability; `EspeakSpeaker` is the host backend.

pub mod espeak;
pub mod lane;

use serde::Serialize;

pub use espeak::EspeakSpeaker;

/// Fire-and-forget text-to-speech. Returns false when playback could not start.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> bool;
}

/// Voice locales in order of preference.
pub const PREFERRED_LANGS: [&str; 5] = ["hi-IN", "hi", "sa", "sa-IN", "ne-NP"];

/// Slower than normal, slightly raised pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeechParams {
    /// Relative to the platform's normal speaking rate.
    pub rate: f32,
    /// Relative to the platform's normal pitch.
    pub pitch: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 0.7,
            pitch: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

/// Pick a voice: preferred locales first, then anything named female, else none
/// (the platform default).
pub fn select_voice(voices: &[Voice]) -> Option<&Voice> {
    PREFERRED_LANGS
        .iter()
        .find_map(|lang| voices.iter().find(|v| v.lang == *lang))
        .or_else(|| {
            voices
                .iter()
                .find(|v| v.name.contains("female") || v.name.contains("Female"))
        })
}

/// Text actually handed to the synthesizer; the leading comma gives a short pause
/// so the first syllable isn't clipped.
pub fn utterance_text(text: &str) -> String {
    format!(", {text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str, lang: &str) -> Voice {
        Voice {
            name: name.into(),
            lang: lang.into(),
        }
    }

    #[test]
    fn locale_order_wins_over_list_order() {
        let voices = vec![voice("Nepali", "ne-NP"), voice("Hindi", "hi"), voice("English", "en")];
        assert_eq!(select_voice(&voices).unwrap().name, "Hindi");
    }

    #[test]
    fn female_voice_when_no_locale_matches() {
        let voices = vec![voice("English male", "en"), voice("Samantha Female", "en-US")];
        assert_eq!(select_voice(&voices).unwrap().name, "Samantha Female");
    }

    #[test]
    fn no_preference_means_default_voice() {
        assert!(select_voice(&[voice("English", "en")]).is_none());
        assert!(select_voice(&[]).is_none());
    }

    #[test]
    fn utterance_gets_lead_in() {
        assert_eq!(utterance_text("नमस्ते"), ", नमस्ते");
    }
}
