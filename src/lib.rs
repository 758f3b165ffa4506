//! Sanskrit Speak: Sanskrit learning backend.
//! Main library: configuration, service wiring, HTTP server start-up.

pub mod api;
pub mod chat;
pub mod completion;
pub mod config;
pub mod flashcards;
pub mod metrics;
pub mod notify;
pub mod pronunciation;
pub mod quiz;
pub mod speech;
pub mod translate;
pub mod vocab;

use std::sync::Arc;

use tracing::{info, warn};

use api::sessions::SessionStore;
use chat::{ChatSession, Tutor};
use completion::cache::TranslationCache;
use completion::{ChatCompletionsClient, Completion};
use config::{Config, LogFormat};
use flashcards::Deck;
use metrics::MetricsRegistry;
use quiz::QuizSession;
use speech::{EspeakSpeaker, SpeechParams, Speaker};
use translate::Translator;

/// Live sessions kept per feature before the least recently used is dropped.
const SESSION_CAPACITY: usize = 1024;

/// Shared application state handed to every request handler.
pub struct AppContext {
    pub config: Config,
    /// None when no completion credential is configured.
    pub tutor: Option<Arc<Tutor>>,
    pub translator: Option<Arc<Translator>>,
    pub speaker: Arc<dyn Speaker>,
    pub metrics: Arc<MetricsRegistry>,
    pub chats: SessionStore<ChatSession>,
    pub quizzes: SessionStore<QuizSession>,
    pub decks: SessionStore<Deck>,
}

impl AppContext {
    pub fn new(
        config: Config,
        completion: Option<Arc<dyn Completion>>,
        speaker: Arc<dyn Speaker>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        let tutor = completion.as_ref().map(|c| {
            let tutor = Tutor::new(Arc::clone(c), config.completion.chat, Arc::clone(&metrics));
            if config.autoplay {
                Arc::new(tutor.with_autoplay(Arc::clone(&speaker)))
            } else {
                Arc::new(tutor)
            }
        });
        let translator = completion.map(|c| {
            Arc::new(Translator::new(
                c,
                config.completion.translate,
                config.completion.model.clone(),
                Arc::new(TranslationCache::default()),
                Arc::clone(&metrics),
            ))
        });

        Self {
            config,
            tutor,
            translator,
            speaker,
            metrics,
            chats: SessionStore::new(SESSION_CAPACITY),
            quizzes: SessionStore::new(SESSION_CAPACITY),
            decks: SessionStore::new(SESSION_CAPACITY),
        }
    }
}

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sanskrit_speak=debug,tower_http=info".into()),
        )
        .with_target(true)
        .with_thread_ids(true);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

pub async fn run() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!("sanskrit-speak starting");

    let metrics = Arc::new(MetricsRegistry::new());

    let completion: Option<Arc<dyn Completion>> =
        match ChatCompletionsClient::new(&config.completion, Arc::clone(&metrics)) {
            Ok(client) => {
                info!(model = client.model(), "completion client initialized");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "completion client init failed (API key missing?), chat and translation disabled");
                None
            }
        };

    let speaker = Arc::new(
        EspeakSpeaker::new(
            &config.speech_command,
            SpeechParams::default(),
            Arc::clone(&metrics),
        )
        .await,
    );

    let addr = config.bind_addr();
    let ctx = Arc::new(AppContext::new(config, completion, speaker, metrics));
    let app = api::router(ctx);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sanskrit-speak stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
