use crate::domain::card::Card;
use crate::domain::role::Role;
use crate::error::Result;
use crate::services::card_repository::CardRepository;
use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Reverse;
use std::sync::Arc;
use uuid::Uuid;

/// Process-local card store. Contents are lost on restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryCardRepository {
    cards: Arc<DashMap<Uuid, Card>>,
}

impl MemoryCardRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_for(&self, role: Role, unread_only: bool) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|entry| entry.receiver_role == role && !(unread_only && entry.is_read))
            .map(|entry| entry.value().clone())
            .collect();
        cards.sort_by_key(|card| Reverse((card.timestamp, card.id)));
        cards
    }
}

#[async_trait]
impl CardRepository for MemoryCardRepository {
    async fn insert(&self, card: &Card) -> Result<Card> {
        self.cards.insert(card.id, card.clone());
        Ok(card.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>> {
        Ok(self.cards.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_receiver(&self, role: Role) -> Result<Vec<Card>> {
        Ok(self.collect_for(role, false))
    }

    async fn find_unread_by_receiver(&self, role: Role) -> Result<Vec<Card>> {
        Ok(self.collect_for(role, true))
    }

    async fn count_unread_by_receiver(&self, role: Role) -> Result<u64> {
        let count = self.cards.iter().filter(|entry| entry.receiver_role == role && !entry.is_read).count();
        Ok(count as u64)
    }

    #[tracing::instrument(level = "debug", skip(self, cards), fields(batch_count = cards.len()))]
    async fn save_all(&self, cards: &[Card]) -> Result<()> {
        for card in cards {
            self.cards
                .entry(card.id)
                .and_modify(|stored| stored.is_read |= card.is_read)
                .or_insert_with(|| card.clone());
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
