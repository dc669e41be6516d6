use crate::domain::card::Card;
use crate::domain::role::Role;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistent collection of cards.
///
/// Listing queries return newest first, with ties on `timestamp` broken by id
/// (descending) so the order is stable. Writes are atomic per card only.
#[async_trait]
pub trait CardRepository: Send + Sync + std::fmt::Debug {
    /// Stores a new card and returns it as persisted.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the write fails.
    async fn insert(&self, card: &Card) -> Result<Card>;

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>>;

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    async fn find_by_receiver(&self, role: Role) -> Result<Vec<Card>>;

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    async fn find_unread_by_receiver(&self, role: Role) -> Result<Vec<Card>>;

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    async fn count_unread_by_receiver(&self, role: Role) -> Result<u64>;

    /// Upserts a batch of cards in one operation.
    ///
    /// Only the read flag of an existing card is updated, and it is never
    /// cleared: a stored `is_read = true` survives a stale write.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the write fails.
    async fn save_all(&self, cards: &[Card]) -> Result<()>;

    /// # Errors
    /// Returns `AppError::Database` if the write fails.
    async fn save(&self, card: &Card) -> Result<()> {
        self.save_all(std::slice::from_ref(card)).await
    }

    /// Cheap round trip used by the readiness probe.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the backing store is unreachable.
    async fn ping(&self) -> Result<()>;
}
