use crate::api::AppState;
use crate::api::schemas::cards::{CardResponse, SendCardRequest, UnreadCountResponse};
use crate::domain::role::Role;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Sends a card from `senderRole` to their partner.
///
/// # Errors
/// Returns `AppError::BadRequest` if `senderRole` is not a known role.
pub async fn send_card(
    State(state): State<AppState>,
    Json(payload): Json<SendCardRequest>,
) -> Result<Json<CardResponse>> {
    let sender_role: Role = payload.sender_role.parse()?;

    let card = state
        .card_service
        .send_card(sender_role, payload.card_type, payload.title, payload.icon, payload.message)
        .await?;

    Ok(Json(card.into()))
}

/// Lists every card received by a role, newest first.
///
/// # Errors
/// Returns `AppError::BadRequest` if the role is unknown.
pub async fn get_received_cards(
    State(state): State<AppState>,
    Path(receiver_role): Path<String>,
) -> Result<Json<Vec<CardResponse>>> {
    let cards = state.card_service.get_received_cards(receiver_role.parse()?).await?;
    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

/// Lists unread cards received by a role, newest first.
///
/// # Errors
/// Returns `AppError::BadRequest` if the role is unknown.
pub async fn get_unread_cards(
    State(state): State<AppState>,
    Path(receiver_role): Path<String>,
) -> Result<Json<Vec<CardResponse>>> {
    let cards = state.card_service.get_unread_cards(receiver_role.parse()?).await?;
    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

/// # Errors
/// Returns `AppError::BadRequest` if the role is unknown.
pub async fn get_unread_count(
    State(state): State<AppState>,
    Path(receiver_role): Path<String>,
) -> Result<Json<UnreadCountResponse>> {
    let count = state.card_service.get_unread_count(receiver_role.parse()?).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// Marks a single card as read.
///
/// An id that is not a UUID cannot name a stored card, so it gets the same 404 as an unknown one.
///
/// # Errors
/// Returns `AppError::NotFound` if no card has this id.
pub async fn mark_as_read(State(state): State<AppState>, Path(card_id): Path<String>) -> Result<Json<CardResponse>> {
    let Ok(card_id) = Uuid::parse_str(&card_id) else {
        tracing::debug!(card_id = %card_id, "Malformed card id");
        return Err(AppError::NotFound);
    };

    let card = state.card_service.mark_as_read(card_id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(card.into()))
}

/// Marks all unread cards of a role as read. Responds with an empty body.
///
/// # Errors
/// Returns `AppError::BadRequest` if the role is unknown.
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    Path(receiver_role): Path<String>,
) -> Result<impl IntoResponse> {
    let role: Role = receiver_role.parse()?;
    let flipped = state.card_service.mark_all_as_read(role).await?;
    tracing::info!(receiver = %role, count = flipped, "Marked all cards as read");
    Ok(StatusCode::OK)
}
