use crate::domain::card::Card;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct CardRecord {
    pub(crate) id: Uuid,
    pub(crate) sender_role: String,
    pub(crate) receiver_role: String,
    pub(crate) card_type: String,
    pub(crate) title: String,
    pub(crate) icon: String,
    pub(crate) message: String,
    pub(crate) sent_at: OffsetDateTime,
    pub(crate) is_read: bool,
}

impl TryFrom<CardRecord> for Card {
    type Error = String;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        let sender_role = record.sender_role.parse().map_err(|e| format!("card {}: {e}", record.id))?;
        let receiver_role = record.receiver_role.parse().map_err(|e| format!("card {}: {e}", record.id))?;
        Ok(Self {
            id: record.id,
            sender_role,
            receiver_role,
            card_type: record.card_type,
            title: record.title,
            icon: record.icon,
            message: record.message,
            timestamp: record.sent_at,
            is_read: record.is_read,
        })
    }
}
