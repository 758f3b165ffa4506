use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, Ctx};
use crate::chat::{category_query, ChatAction, ChatMessage, ChatSession};
use crate::notify::Notice;
use crate::vocab::Category;

#[derive(Debug, Serialize)]
pub struct ChatView {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub loading: bool,
}

impl ChatView {
    fn of(id: Uuid, session: &ChatSession) -> Self {
        Self {
            id,
            messages: session.messages().to_vec(),
            loading: session.is_loading(),
        }
    }
}

/// The two messages one exchange appended.
#[derive(Debug, Serialize)]
pub struct ChatTurn {
    pub question: ChatMessage,
    pub reply: ChatMessage,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub content: String,
}

/// POST /api/chat: open a conversation seeded with the welcome message.
pub async fn create(State(ctx): State<Ctx>) -> (StatusCode, Json<ChatView>) {
    let session = ChatSession::new();
    let view_session = session.clone();
    let id = ctx.chats.insert(session);
    tracing::info!(session = %id, "chat_created");
    (StatusCode::CREATED, Json(ChatView::of(id, &view_session)))
}

/// GET /api/chat/{id}
pub async fn show(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> Result<Json<ChatView>, ApiError> {
    ctx.chats
        .with_mut(&id, |s| ChatView::of(id, s))
        .map(Json)
        .ok_or(ApiError::NotFound("chat session"))
}

/// POST /api/chat/{id}/messages
pub async fn send_message(
    State(ctx): State<Ctx>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessage>,
) -> Result<Json<ChatTurn>, ApiError> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("message content is empty".into()));
    }
    converse(&ctx, id, content.to_string()).await
}

/// POST /api/chat/{id}/categories/{category}: ask the canned question for a category.
pub async fn ask_category(
    State(ctx): State<Ctx>,
    Path((id, category)): Path<(Uuid, String)>,
) -> Result<Json<ChatTurn>, ApiError> {
    converse(&ctx, id, category_query(&category)).await
}

async fn converse(ctx: &Ctx, id: Uuid, content: String) -> Result<Json<ChatTurn>, ApiError> {
    let tutor = ctx.tutor.clone().ok_or(ApiError::Unavailable)?;

    // The session lock is never held across the completion call.
    let question = ctx
        .chats
        .with_mut(&id, |s| s.apply(ChatAction::Send(content.clone())).clone())
        .ok_or(ApiError::NotFound("chat session"))?;

    // The turn runs detached so a client that hangs up still gets its reply
    // appended and the session's loading flag cleared.
    let turn_ctx = Arc::clone(ctx);
    let turn = tokio::spawn(async move {
        let reply = tutor.reply(&content).await;
        let category = reply.category;
        let notice = reply.notice.clone();
        let message = turn_ctx
            .chats
            .with_mut(&id, |s| s.apply(ChatAction::Reply(reply)).clone());
        (message, category, notice)
    });

    let (reply, category, notice) = turn
        .await
        .map_err(|e| ApiError::Internal(format!("chat turn failed: {e}")))?;
    let reply = reply.ok_or(ApiError::NotFound("chat session"))?;

    Ok(Json(ChatTurn {
        question,
        reply,
        category,
        notice,
    }))
}
