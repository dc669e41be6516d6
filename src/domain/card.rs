use crate::domain::role::Role;
use time::OffsetDateTime;
use uuid::Uuid;

/// An interaction card (a hug, a drink, "miss you"...) sent from one partner to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: Uuid,
    pub sender_role: Role,
    pub receiver_role: Role,
    pub card_type: String,
    pub title: String,
    pub icon: String,
    pub message: String,
    pub timestamp: OffsetDateTime,
    pub is_read: bool,
}

impl Card {
    /// Builds a fresh, unread card addressed to the sender's partner.
    ///
    /// The timestamp is truncated to microseconds, the precision of `TIMESTAMPTZ`,
    /// so a card compares equal before and after a round trip through Postgres.
    #[must_use]
    pub fn new(sender_role: Role, card_type: String, title: String, icon: String, message: String) -> Self {
        let now = OffsetDateTime::now_utc();
        let timestamp = now.replace_nanosecond(now.microsecond() * 1_000).unwrap_or(now);

        Self {
            id: Uuid::now_v7(),
            sender_role,
            receiver_role: sender_role.partner(),
            card_type,
            title,
            icon,
            message,
            timestamp,
            is_read: false,
        }
    }

    /// Flips the card to read. Returns `false` if it already was.
    pub const fn mark_read(&mut self) -> bool {
        let changed = !self.is_read;
        self.is_read = true;
        changed
    }
}
