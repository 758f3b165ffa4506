//! Stateless endpoints: translation, speech, health and metrics.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{ApiError, Ctx};
use crate::metrics::MetricSummary;
use crate::notify::Notice;
use crate::translate::TranslateOutcome;

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub completion: bool,
    pub model: String,
    pub autoplay: bool,
}

/// GET /health
pub async fn health(State(ctx): State<Ctx>) -> Json<Health> {
    Json(Health {
        status: "ok",
        completion: ctx.tutor.is_some(),
        model: ctx.config.completion.model.clone(),
        autoplay: ctx.config.autoplay,
    })
}

/// POST /api/translate
pub async fn translate(
    State(ctx): State<Ctx>,
    Json(req): Json<TextBody>,
) -> Result<Json<TranslateOutcome>, ApiError> {
    let translator = ctx.translator.clone().ok_or(ApiError::Unavailable)?;
    Ok(Json(translator.translate(&req.text).await))
}

/// POST /api/speak
pub async fn speak(State(ctx): State<Ctx>, Json(req): Json<TextBody>) -> Json<SpeakResponse> {
    let ok = ctx.speaker.speak(&req.text);
    Json(SpeakResponse {
        ok,
        notice: (!ok).then(|| Notice::error("Could not generate speech")),
    })
}

/// GET /api/metrics
pub async fn metrics(State(ctx): State<Ctx>) -> Json<HashMap<String, MetricSummary>> {
    Json(ctx.metrics.summary())
}
