use crate::config::HealthConfig;
use crate::services::card_repository::CardRepository;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("card-server");
        Self {
            status: meter
                .i64_gauge("card_server_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    repo: Arc<dyn CardRepository>,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(repo: Arc<dyn CardRepository>, config: HealthConfig) -> Self {
        Self { repo, config, metrics: Metrics::new() }
    }

    /// Checks that the card store answers within the configured timeout.
    ///
    /// # Errors
    /// Returns a string describing the failure if the store is unreachable.
    pub async fn check_storage(&self) -> Result<(), String> {
        let storage_timeout = Duration::from_millis(self.config.storage_timeout_ms);

        match timeout(storage_timeout, self.repo.ping()).await {
            Ok(Ok(())) => {
                self.metrics.status.record(1, &[KeyValue::new("component", "storage")]);
                Ok(())
            }
            Ok(Err(e)) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "storage")]);
                Err(format!("Storage check failed: {e:?}"))
            }
            Err(_) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "storage")]);
                Err("Storage check timed out".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryCardRepository;
    use crate::domain::card::Card;
    use crate::domain::role::Role;
    use crate::error::{AppError, Result};
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Answers list queries like an empty store; `ping` fails or hangs.
    #[derive(Debug)]
    enum BrokenRepository {
        Failing,
        Hanging,
    }

    #[async_trait]
    impl CardRepository for BrokenRepository {
        async fn insert(&self, card: &Card) -> Result<Card> {
            Ok(card.clone())
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Card>> {
            Ok(None)
        }

        async fn find_by_receiver(&self, _role: Role) -> Result<Vec<Card>> {
            Ok(Vec::new())
        }

        async fn find_unread_by_receiver(&self, _role: Role) -> Result<Vec<Card>> {
            Ok(Vec::new())
        }

        async fn count_unread_by_receiver(&self, _role: Role) -> Result<u64> {
            Ok(0)
        }

        async fn save_all(&self, _cards: &[Card]) -> Result<()> {
            Ok(())
        }

        async fn ping(&self) -> Result<()> {
            match self {
                Self::Failing => Err(AppError::Internal),
                Self::Hanging => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(())
                }
            }
        }
    }

    fn fast_config() -> HealthConfig {
        HealthConfig { storage_timeout_ms: 50 }
    }

    #[tokio::test]
    async fn test_memory_store_is_ready() {
        let service = HealthService::new(Arc::new(MemoryCardRepository::new()), HealthConfig::default());
        assert!(service.check_storage().await.is_ok());
    }

    #[tokio::test]
    async fn test_storage_error_is_reported() {
        let service = HealthService::new(Arc::new(BrokenRepository::Failing), fast_config());

        let err = service.check_storage().await.unwrap_err();
        assert!(err.starts_with("Storage check failed"), "{err}");
    }

    #[tokio::test]
    async fn test_storage_timeout_is_reported() {
        let service = HealthService::new(Arc::new(BrokenRepository::Hanging), fast_config());

        let err = service.check_storage().await.unwrap_err();
        assert_eq!(err, "Storage check timed out");
    }
}
