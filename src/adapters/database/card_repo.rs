use crate::adapters::database::DbPool;
use crate::adapters::database::records::CardRecord;
use crate::domain::card::Card;
use crate::domain::role::Role;
use crate::error::{AppError, Result};
use crate::services::card_repository::CardRepository;
use async_trait::async_trait;
use uuid::Uuid;

const CARD_COLUMNS: &str = "id, sender_role, receiver_role, card_type, title, icon, message, sent_at, is_read";

#[derive(Clone, Debug)]
pub struct PgCardRepository {
    pool: DbPool,
}

impl PgCardRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_cards(records: Vec<CardRecord>) -> Result<Vec<Card>> {
    records.into_iter().map(|r| Card::try_from(r).map_err(AppError::InternalMsg)).collect()
}

#[async_trait]
impl CardRepository for PgCardRepository {
    #[tracing::instrument(level = "debug", skip(self, card), fields(card_id = %card.id), err)]
    async fn insert(&self, card: &Card) -> Result<Card> {
        let mut conn = self.pool.acquire().await?;
        let record = sqlx::query_as::<_, CardRecord>(&format!(
            r#"
            INSERT INTO interaction_cards
                (id, sender_role, receiver_role, card_type, title, icon, message, sent_at, is_read)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CARD_COLUMNS}
            "#
        ))
        .bind(card.id)
        .bind(card.sender_role.as_str())
        .bind(card.receiver_role.as_str())
        .bind(&card.card_type)
        .bind(&card.title)
        .bind(&card.icon)
        .bind(&card.message)
        .bind(card.timestamp)
        .bind(card.is_read)
        .fetch_one(&mut *conn)
        .await?;

        Card::try_from(record).map_err(AppError::InternalMsg)
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>> {
        let mut conn = self.pool.acquire().await?;
        let record = sqlx::query_as::<_, CardRecord>(&format!(
            "SELECT {CARD_COLUMNS} FROM interaction_cards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        record.map(|r| Card::try_from(r).map_err(AppError::InternalMsg)).transpose()
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn find_by_receiver(&self, role: Role) -> Result<Vec<Card>> {
        let mut conn = self.pool.acquire().await?;
        let records = sqlx::query_as::<_, CardRecord>(&format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM interaction_cards
            WHERE receiver_role = $1
            ORDER BY sent_at DESC, id DESC
            "#
        ))
        .bind(role.as_str())
        .fetch_all(&mut *conn)
        .await?;

        into_cards(records)
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn find_unread_by_receiver(&self, role: Role) -> Result<Vec<Card>> {
        let mut conn = self.pool.acquire().await?;
        let records = sqlx::query_as::<_, CardRecord>(&format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM interaction_cards
            WHERE receiver_role = $1 AND NOT is_read
            ORDER BY sent_at DESC, id DESC
            "#
        ))
        .bind(role.as_str())
        .fetch_all(&mut *conn)
        .await?;

        into_cards(records)
    }

    #[tracing::instrument(level = "debug", skip(self), err)]
    async fn count_unread_by_receiver(&self, role: Role) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM interaction_cards WHERE receiver_role = $1 AND NOT is_read")
                .bind(role.as_str())
                .fetch_one(&mut *conn)
                .await?;

        Ok(count.unsigned_abs())
    }

    #[tracing::instrument(level = "debug", skip(self, cards), fields(batch_count = cards.len()), err)]
    async fn save_all(&self, cards: &[Card]) -> Result<()> {
        if cards.is_empty() {
            return Ok(());
        }

        let mut ids = Vec::with_capacity(cards.len());
        let mut sender_roles = Vec::with_capacity(cards.len());
        let mut receiver_roles = Vec::with_capacity(cards.len());
        let mut card_types = Vec::with_capacity(cards.len());
        let mut titles = Vec::with_capacity(cards.len());
        let mut icons = Vec::with_capacity(cards.len());
        let mut messages = Vec::with_capacity(cards.len());
        let mut sent_ats = Vec::with_capacity(cards.len());
        let mut read_flags = Vec::with_capacity(cards.len());

        for card in cards {
            ids.push(card.id);
            sender_roles.push(card.sender_role.as_str());
            receiver_roles.push(card.receiver_role.as_str());
            card_types.push(card.card_type.as_str());
            titles.push(card.title.as_str());
            icons.push(card.icon.as_str());
            messages.push(card.message.as_str());
            sent_ats.push(card.timestamp);
            read_flags.push(card.is_read);
        }

        let mut conn = self.pool.acquire().await?;
        // sent_at is left alone on conflict and is_read can only be raised.
        sqlx::query(
            r#"
            INSERT INTO interaction_cards
                (id, sender_role, receiver_role, card_type, title, icon, message, sent_at, is_read)
            SELECT * FROM UNNEST(
                $1::uuid[], $2::text[], $3::text[], $4::text[], $5::text[],
                $6::text[], $7::text[], $8::timestamptz[], $9::bool[]
            )
            ON CONFLICT (id) DO UPDATE
            SET is_read = interaction_cards.is_read OR EXCLUDED.is_read
            "#,
        )
        .bind(&ids)
        .bind(&sender_roles)
        .bind(&receiver_roles)
        .bind(&card_types)
        .bind(&titles)
        .bind(&icons)
        .bind(&messages)
        .bind(&sent_ats)
        .bind(&read_flags)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
