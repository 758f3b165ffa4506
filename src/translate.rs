//! English → Sanskrit translation over the completion service, with caching
//! and source-language detection.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::completion::cache::TranslationCache;
use crate::completion::{split_reply, Completion, CompletionRequest, Sampling};
use crate::metrics::{metric_names, MetricsRegistry};
use crate::notify::Notice;

const SYSTEM_PROMPT: &str = "You are a Sanskrit language translator. Provide accurate translations from English to Sanskrit using Devanagari script. Format response with Sanskrit first, then English explanation.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub sanskrit: String,
    pub english: String,
    /// ISO 639-1 code of the input, when detection was reliable.
    pub source_lang: Option<String>,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateOutcome {
    #[serde(flatten)]
    pub translation: Translation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Detects the dominant language of `text` using whatlang.
/// Returns an ISO 639-1 code or None if detection is unreliable.
pub fn detect_language(text: &str) -> Option<String> {
    let info = whatlang::detect(text)?;
    if !info.is_reliable() {
        return None;
    }
    Some(lang_to_code(info.lang()).to_string())
}

fn lang_to_code(lang: whatlang::Lang) -> &'static str {
    use whatlang::Lang::*;
    match lang {
        Eng => "en",
        Hin => "hi",
        Mar => "mr",
        Nep => "ne",
        Ben => "bn",
        Guj => "gu",
        Pan => "pa",
        Tam => "ta",
        Tel => "te",
        Fra => "fr",
        Deu => "de",
        Spa => "es",
        Ita => "it",
        Por => "pt",
        Rus => "ru",
        _ => "other",
    }
}

pub struct Translator {
    completion: Arc<dyn Completion>,
    sampling: Sampling,
    /// Part of the cache key.
    model: String,
    cache: Arc<TranslationCache>,
    metrics: Arc<MetricsRegistry>,
}

impl Translator {
    pub fn new(
        completion: Arc<dyn Completion>,
        sampling: Sampling,
        model: impl Into<String>,
        cache: Arc<TranslationCache>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            completion,
            sampling,
            model: model.into(),
            cache,
            metrics,
        }
    }

    /// Translate `text`. Blank input and failures yield an empty translation plus a notice.
    pub async fn translate(&self, text: &str) -> TranslateOutcome {
        if text.trim().is_empty() {
            return TranslateOutcome {
                translation: Translation::default(),
                notice: Some(Notice::error("Please enter some text to translate")),
            };
        }

        let source_lang = detect_language(text);
        let normalized = TranslationCache::normalize(text);
        let key = TranslationCache::compute_key(&self.model, &normalized);

        if let Some(hit) = self.cache.get(&key) {
            debug!(chars = normalized.chars().count(), "translation cache hit");
            return TranslateOutcome {
                translation: Translation {
                    sanskrit: hit.sanskrit,
                    english: hit.explanation,
                    source_lang,
                    cached: true,
                },
                notice: None,
            };
        }

        let span = self.metrics.span(metric_names::TRANSLATE_DONE);
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: format!("Translate this to Sanskrit: {text}"),
            sampling: self.sampling,
        };

        let result = self.completion.complete(request).await;
        let elapsed_us = span.finish();

        match result {
            Ok(raw) => {
                let split = split_reply(&raw);
                info!(
                    source_lang = source_lang.as_deref().unwrap_or("unknown"),
                    has_sanskrit = !split.sanskrit.is_empty(),
                    elapsed_ms = elapsed_us / 1000.0,
                    "translation done"
                );
                self.cache.insert(key, split.clone());
                TranslateOutcome {
                    translation: Translation {
                        sanskrit: split.sanskrit,
                        english: split.explanation,
                        source_lang,
                        cached: false,
                    },
                    notice: None,
                }
            }
            Err(e) => {
                error!(error = %e, elapsed_ms = elapsed_us / 1000.0, "translation failed");
                TranslateOutcome {
                    translation: Translation {
                        source_lang,
                        ..Translation::default()
                    },
                    notice: Some(Notice::error("Could not translate text")),
                }
            }
        }
    }
}
