use crate::domain::card::Card;
use crate::domain::role::Role;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCardRequest {
    pub sender_role: String,
    pub card_type: String,
    pub title: String,
    pub icon: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: Uuid,
    pub sender_role: Role,
    pub receiver_role: Role,
    pub card_type: String,
    pub title: String,
    pub icon: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub is_read: bool,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            sender_role: card.sender_role,
            receiver_role: card.receiver_role,
            card_type: card.card_type,
            title: card.title,
            icon: card.icon,
            message: card.message,
            timestamp: card.timestamp,
            is_read: card.is_read,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}
