use crate::domain::card::Card;
use crate::domain::role::Role;
use crate::error::Result;
use crate::services::card_repository::CardRepository;
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    pub(crate) sent_total: Counter<u64>,
    pub(crate) read_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("card-server");
        Self {
            sent_total: meter
                .u64_counter("cards_sent_total")
                .with_description("Total cards sent, by sender role and outcome")
                .build(),
            read_total: meter
                .u64_counter("cards_read_total")
                .with_description("Total cards flipped from unread to read")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CardService {
    repo: Arc<dyn CardRepository>,
    metrics: Metrics,
}

impl CardService {
    #[must_use]
    pub fn new(repo: Arc<dyn CardRepository>) -> Self {
        Self { repo, metrics: Metrics::new() }
    }

    /// Sends a card to the sender's partner.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the card cannot be stored.
    #[tracing::instrument(
        err(level = "warn"),
        skip_all,
        fields(sender = %sender_role, card_type = %card_type)
    )]
    pub async fn send_card(
        &self,
        sender_role: Role,
        card_type: String,
        title: String,
        icon: String,
        message: Option<String>,
    ) -> Result<Card> {
        let card = Card::new(sender_role, card_type, title, icon, message.unwrap_or_default());

        match self.repo.insert(&card).await {
            Ok(stored) => {
                tracing::debug!(card_id = %stored.id, receiver = %stored.receiver_role, "Card stored");
                self.metrics
                    .sent_total
                    .add(1, &[KeyValue::new("sender", sender_role.as_str()), KeyValue::new("status", "success")]);
                Ok(stored)
            }
            Err(e) => {
                self.metrics
                    .sent_total
                    .add(1, &[KeyValue::new("sender", sender_role.as_str()), KeyValue::new("status", "failure")]);
                Err(e)
            }
        }
    }

    /// All cards received by `receiver_role`, newest first.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err(level = "warn"), skip_all, fields(receiver = %receiver_role))]
    pub async fn get_received_cards(&self, receiver_role: Role) -> Result<Vec<Card>> {
        self.repo.find_by_receiver(receiver_role).await
    }

    /// Unread cards received by `receiver_role`, newest first.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err(level = "warn"), skip_all, fields(receiver = %receiver_role))]
    pub async fn get_unread_cards(&self, receiver_role: Role) -> Result<Vec<Card>> {
        self.repo.find_unread_by_receiver(receiver_role).await
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err(level = "warn"), skip_all, fields(receiver = %receiver_role))]
    pub async fn get_unread_count(&self, receiver_role: Role) -> Result<u64> {
        self.repo.count_unread_by_receiver(receiver_role).await
    }

    /// Marks a single card as read.
    ///
    /// Returns `Ok(None)` when no card has this id; nothing is written in that case.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the lookup or the write fails.
    #[tracing::instrument(err(level = "warn"), skip(self), fields(card_id = %card_id))]
    pub async fn mark_as_read(&self, card_id: Uuid) -> Result<Option<Card>> {
        let Some(mut card) = self.repo.find_by_id(card_id).await? else {
            tracing::debug!("Card not found");
            return Ok(None);
        };

        if card.mark_read() {
            self.metrics.read_total.add(1, &[KeyValue::new("receiver", card.receiver_role.as_str())]);
        }
        self.repo.save(&card).await?;

        Ok(Some(card))
    }

    /// Marks every unread card of `receiver_role` as read in one bulk write.
    ///
    /// Not atomic with concurrent sends: a card stored after the read phase stays unread.
    /// Returns the number of cards flipped.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the lookup or the write fails.
    #[tracing::instrument(err(level = "warn"), skip_all, fields(receiver = %receiver_role))]
    pub async fn mark_all_as_read(&self, receiver_role: Role) -> Result<u64> {
        let mut unread = self.repo.find_unread_by_receiver(receiver_role).await?;
        if unread.is_empty() {
            return Ok(0);
        }

        for card in &mut unread {
            card.mark_read();
        }
        self.repo.save_all(&unread).await?;

        let flipped = unread.len() as u64;
        self.metrics.read_total.add(flipped, &[KeyValue::new("receiver", receiver_role.as_str())]);
        tracing::debug!(count = flipped, "Marked all cards as read");

        Ok(flipped)
    }
}
