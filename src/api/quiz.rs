use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, Ctx};
use crate::notify::Notice;
use crate::quiz::{QuizAction, QuizError, QuizSession, QuizView};
use crate::vocab::Category;

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub quiz: QuizView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Deserialize)]
pub struct StartQuiz {
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerQuiz {
    pub option: String,
}

/// POST /api/quiz: create a quiz and start a round. A category too small for
/// a quiz leaves the new quiz in setup with an error notice.
pub async fn start(
    State(ctx): State<Ctx>,
    Json(req): Json<StartQuiz>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    let category: Category = req.category.parse()?;
    let mut session = QuizSession::new(category);
    let notice = match session.apply(QuizAction::Start(category), &mut rand::rng()) {
        Ok(notice) => notice,
        Err(QuizError::NotEnoughItems { found }) => {
            tracing::warn!(%category, found, "quiz_not_enough_items");
            Some(Notice::error("Not enough items in this category for a quiz"))
        }
        Err(e) => return Err(e.into()),
    };
    let quiz = session.view();
    let id = ctx.quizzes.insert(session);
    tracing::info!(session = %id, %category, "quiz_created");
    Ok((StatusCode::CREATED, Json(QuizResponse { id, quiz, notice })))
}

/// GET /api/quiz/{id}
pub async fn show(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> Result<Json<QuizResponse>, ApiError> {
    ctx.quizzes
        .with_mut(&id, |quiz| quiz.view())
        .map(|quiz| {
            Json(QuizResponse {
                id,
                quiz,
                notice: None,
            })
        })
        .ok_or(ApiError::NotFound("quiz"))
}

/// POST /api/quiz/{id}/answer
pub async fn answer(
    State(ctx): State<Ctx>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerQuiz>,
) -> Result<Json<QuizResponse>, ApiError> {
    act(&ctx, id, QuizAction::Answer(req.option))
}

/// POST /api/quiz/{id}/next
pub async fn advance(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> Result<Json<QuizResponse>, ApiError> {
    act(&ctx, id, QuizAction::Advance)
}

/// POST /api/quiz/{id}/restart
pub async fn restart(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> Result<Json<QuizResponse>, ApiError> {
    act(&ctx, id, QuizAction::Restart)
}

/// POST /api/quiz/{id}/category: back to setup to pick another category.
pub async fn choose_category(
    State(ctx): State<Ctx>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuizResponse>, ApiError> {
    act(&ctx, id, QuizAction::ChooseCategory)
}

fn act(ctx: &Ctx, id: Uuid, action: QuizAction) -> Result<Json<QuizResponse>, ApiError> {
    let (quiz, notice) = ctx
        .quizzes
        .with_mut(&id, |quiz| {
            quiz.apply(action, &mut rand::rng())
                .map(|notice| (quiz.view(), notice))
        })
        .ok_or(ApiError::NotFound("quiz"))??;
    Ok(Json(QuizResponse { id, quiz, notice }))
}
