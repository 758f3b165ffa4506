//! Chat assistant: an append-only conversation and the tutor that answers it.
//! The tutor picks a vocabulary category for the query, seeds the system prompt
//! with it and splits the completion into Sanskrit and English.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::completion::{split_reply, Completion, CompletionRequest, Sampling};
use crate::metrics::{metric_names, MetricsRegistry};
use crate::notify::Notice;
use crate::speech::Speaker;
use crate::vocab::matcher::{match_category, CategoryMatch};
use crate::vocab::Category;

const WELCOME_ENGLISH: &str = "Welcome to Sanskrit Speak! I can help you learn Sanskrit. Ask me about greetings, numbers, days, colors, and more.";
const WELCOME_SANSKRIT: &str = "संस्कृत वाणी में आपका स्वागतम्! मैं आपको संस्कृत सिखने में मदद कर सकता हूँ। मुझसे अभिवादन, संख्याएँ, दिन, रंग, और अधिक के बारे में पूछें।";
const APOLOGY: &str =
    "I apologize, but I could not process your request at this time. Please try again later.";
/// Entries from the matched category quoted in the system prompt.
const PROMPT_EXAMPLES: usize = 3;
/// Delay before a reply's Sanskrit is spoken.
const AUTOPLAY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanskrit: Option<String>,
    pub is_bot: bool,
}

/// Result of one tutor turn. Never an error: failures degrade to the apology text.
#[derive(Debug, Clone, Serialize)]
pub struct TutorReply {
    pub english: String,
    pub sanskrit: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone)]
pub enum ChatAction {
    Send(String),
    Reply(TutorReply),
}

/// A conversation. Messages are only ever appended.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    loading: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                id: Uuid::new_v4(),
                content: WELCOME_ENGLISH.to_string(),
                sanskrit: Some(WELCOME_SANSKRIT.to_string()),
                is_bot: true,
            }],
            loading: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Apply an action, returning the message it appended.
    pub fn apply(&mut self, action: ChatAction) -> &ChatMessage {
        let message = match action {
            ChatAction::Send(content) => {
                self.loading = true;
                ChatMessage {
                    id: Uuid::new_v4(),
                    content,
                    sanskrit: None,
                    is_bot: false,
                }
            }
            ChatAction::Reply(reply) => {
                self.loading = false;
                ChatMessage {
                    id: Uuid::new_v4(),
                    content: reply.english,
                    sanskrit: Some(reply.sanskrit),
                    is_bot: true,
                }
            }
        };
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Canned question sent when a category shortcut is picked.
pub fn category_query(category: &str) -> String {
    match category {
        "greetings" => "Teach me some Sanskrit greetings".into(),
        "phrases" => "What are some common phrases in Sanskrit?".into(),
        "numbers" => "How do I count in Sanskrit?".into(),
        "days" => "Tell me the days of the week in Sanskrit".into(),
        "objects" => "What are common objects called in Sanskrit?".into(),
        "colors" => "What are the colors in Sanskrit?".into(),
        "family" => "How do I say family relations in Sanskrit?".into(),
        "directions" => "Teach me directions in Sanskrit".into(),
        other => format!("Teach me about {other} in Sanskrit"),
    }
}

/// System prompt seeded with the first few entries of the matched category.
pub fn system_prompt(matched: &CategoryMatch) -> String {
    let examples: Vec<String> = matched
        .entries
        .iter()
        .take(PROMPT_EXAMPLES)
        .map(|e| format!("{} ({})", e.term, e.gloss))
        .collect();
    format!(
        "You are a Sanskrit language teacher. Respond in both Sanskrit and English.\n\
         Keep responses concise and helpful. Include the Sanskrit script first, followed by the English translation.\n\
         Here are some relevant Sanskrit phrases from the '{}' category that may help with the response:\n{}",
        matched.category,
        examples.join("\n")
    )
}

pub struct Tutor {
    completion: Arc<dyn Completion>,
    sampling: Sampling,
    speaker: Option<Arc<dyn Speaker>>,
    metrics: Arc<MetricsRegistry>,
}

impl Tutor {
    pub fn new(
        completion: Arc<dyn Completion>,
        sampling: Sampling,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            completion,
            sampling,
            speaker: None,
            metrics,
        }
    }

    /// Speak the Sanskrit part of each reply through `speaker`.
    pub fn with_autoplay(mut self, speaker: Arc<dyn Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    /// Answer one user message.
    pub async fn reply(&self, query: &str) -> TutorReply {
        let span = self.metrics.span(metric_names::CHAT_REPLY);
        let matched = match_category(query, &mut rand::rng());
        info!(category = %matched.category, score = matched.score, "category_matched");

        let request = CompletionRequest {
            system: system_prompt(&matched),
            user: query.to_string(),
            sampling: self.sampling,
        };

        let reply = match self.completion.complete(request).await {
            Ok(raw) => {
                let split = split_reply(&raw);
                TutorReply {
                    english: split.explanation,
                    sanskrit: split.sanskrit,
                    category: matched.category,
                    notice: None,
                }
            }
            Err(e) => {
                error!(error = %e, "tutor reply failed");
                TutorReply {
                    english: APOLOGY.to_string(),
                    sanskrit: String::new(),
                    category: matched.category,
                    notice: Some(Notice::error(
                        "Could not connect to the Sanskrit learning service",
                    )),
                }
            }
        };
        span.finish();

        if let Some(ref speaker) = self.speaker {
            if !reply.sanskrit.is_empty() {
                let speaker = Arc::clone(speaker);
                let text = reply.sanskrit.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(AUTOPLAY_DELAY).await;
                    speaker.speak(&text);
                });
            }
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Canned(Option<&'static str>);

    #[async_trait]
    impl Completion for Canned {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| CompletionError::Transport("down".into()))
        }
    }

    #[derive(Default)]
    struct Recorder {
        spoken: Mutex<Vec<String>>,
    }

    impl Speaker for Recorder {
        fn speak(&self, text: &str) -> bool {
            self.spoken.lock().push(text.to_string());
            true
        }
    }

    fn autoplay_tutor(reply: Option<&'static str>) -> (Tutor, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let tutor = Tutor::new(
            Arc::new(Canned(reply)),
            Sampling {
                temperature: 0.7,
                max_tokens: 500,
            },
            Arc::new(MetricsRegistry::new()),
        )
        .with_autoplay(recorder.clone());
        (tutor, recorder)
    }

    #[test]
    fn session_starts_with_welcome() {
        let session = ChatSession::new();
        assert_eq!(session.messages().len(), 1);
        assert!(session.messages()[0].is_bot);
        assert!(!session.is_loading());
    }

    #[test]
    fn actions_append_in_order() {
        let mut session = ChatSession::new();
        let user_id = session.apply(ChatAction::Send("hello".into())).id;
        assert!(session.is_loading());
        session.apply(ChatAction::Reply(TutorReply {
            english: "Hello".into(),
            sanskrit: "नमस्ते".into(),
            category: Category::Greetings,
            notice: None,
        }));
        assert!(!session.is_loading());

        let msgs = session.messages();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[1].id, user_id);
        assert!(!msgs[1].is_bot);
        assert_eq!(msgs[2].sanskrit.as_deref(), Some("नमस्ते"));
    }

    #[test]
    fn prompt_quotes_three_entries() {
        let matched = match_category("colors", &mut StdRng::seed_from_u64(0));
        let prompt = system_prompt(&matched);
        assert!(prompt.contains("from the 'colors' category"));
        assert!(prompt.contains("श्वेतः (White)"));
        assert!(prompt.contains("पीतः (Yellow)"));
        assert!(!prompt.contains("नीलः (Blue)"));
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_speaks_sanskrit_after_delay() {
        let (tutor, recorder) = autoplay_tutor(Some("नमस्ते\n\nHello"));
        let reply = tutor.reply("hello").await;
        assert_eq!(reply.sanskrit, "नमस्ते");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(recorder.spoken.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*recorder.spoken.lock(), vec!["नमस्ते".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_skips_replies_without_sanskrit() {
        let (tutor, recorder) = autoplay_tutor(Some("Just English."));
        tutor.reply("hello").await;
        let (failing, failed_recorder) = autoplay_tutor(None);
        let reply = failing.reply("hello").await;
        assert!(reply.notice.is_some());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(recorder.spoken.lock().is_empty());
        assert!(failed_recorder.spoken.lock().is_empty());
    }

    #[test]
    fn canned_category_queries() {
        assert_eq!(category_query("numbers"), "How do I count in Sanskrit?");
        assert_eq!(category_query("elements"), "Teach me about elements in Sanskrit");
    }
}
