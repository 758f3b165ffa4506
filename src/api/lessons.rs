//! Read-only lesson material (categories, pronunciation) and flashcard decks.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, Ctx};
use crate::flashcards::{Deck, DeckAction, DeckView};
use crate::pronunciation::{self, Guide};
use crate::vocab::{self, Category, Entry};

#[derive(Debug, Serialize)]
pub struct CategoryItems {
    pub category: Category,
    pub items: &'static [Entry],
}

/// GET /api/categories
pub async fn list_categories() -> Json<&'static [Category]> {
    Json(vocab::categories())
}

/// GET /api/categories/{name}
pub async fn category_items(Path(name): Path<String>) -> Result<Json<CategoryItems>, ApiError> {
    let category: Category = name.parse()?;
    Ok(Json(CategoryItems {
        category,
        items: category.entries(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PronunciationQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/pronunciation?q=
pub async fn pronunciation(Query(query): Query<PronunciationQuery>) -> Json<Vec<&'static Guide>> {
    Json(pronunciation::search(query.q.trim()))
}

/// GET /api/pronunciation/{id}
pub async fn pronunciation_guide(Path(id): Path<u32>) -> Result<Json<&'static Guide>, ApiError> {
    pronunciation::guide(id)
        .map(Json)
        .ok_or(ApiError::NotFound("pronunciation guide"))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeckFilter {
    #[serde(default)]
    pub category: Option<String>,
}

impl DeckFilter {
    /// None or an empty string means every category.
    fn resolve(&self) -> Result<Option<Category>, ApiError> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => Ok(Some(name.parse()?)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeckResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub deck: DeckView,
}

/// POST /api/flashcards
pub async fn create_deck(
    State(ctx): State<Ctx>,
    body: Bytes,
) -> Result<(StatusCode, Json<DeckResponse>), ApiError> {
    // The body is optional; an absent one selects every category.
    let filter = if body.iter().all(u8::is_ascii_whitespace) {
        DeckFilter::default()
    } else {
        serde_json::from_slice::<DeckFilter>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid deck filter: {e}")))?
    };
    let filter = filter.resolve()?;
    let deck = Deck::new(filter);
    let view = deck.view();
    let id = ctx.decks.insert(deck);
    tracing::info!(session = %id, cards = view.total, "deck_created");
    Ok((StatusCode::CREATED, Json(DeckResponse { id, deck: view })))
}

/// GET /api/flashcards/{id}
pub async fn show_deck(
    State(ctx): State<Ctx>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeckResponse>, ApiError> {
    act(&ctx, id, None)
}

pub async fn flip(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> Result<Json<DeckResponse>, ApiError> {
    act(&ctx, id, Some(DeckAction::Flip))
}

pub async fn next(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> Result<Json<DeckResponse>, ApiError> {
    act(&ctx, id, Some(DeckAction::Next))
}

pub async fn prev(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> Result<Json<DeckResponse>, ApiError> {
    act(&ctx, id, Some(DeckAction::Prev))
}

pub async fn reset(State(ctx): State<Ctx>, Path(id): Path<Uuid>) -> Result<Json<DeckResponse>, ApiError> {
    act(&ctx, id, Some(DeckAction::Reset))
}

/// POST /api/flashcards/{id}/category
pub async fn select_category(
    State(ctx): State<Ctx>,
    Path(id): Path<Uuid>,
    Json(filter): Json<DeckFilter>,
) -> Result<Json<DeckResponse>, ApiError> {
    let filter = filter.resolve()?;
    act(&ctx, id, Some(DeckAction::Select(filter)))
}

fn act(ctx: &Ctx, id: Uuid, action: Option<DeckAction>) -> Result<Json<DeckResponse>, ApiError> {
    ctx.decks
        .with_mut(&id, |deck| {
            if let Some(action) = action {
                deck.apply(action);
            }
            deck.view()
        })
        .map(|deck| Json(DeckResponse { id, deck }))
        .ok_or(ApiError::NotFound("flashcard deck"))
}
