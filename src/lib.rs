#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

use crate::adapters::database::{self, DbPool};
use crate::adapters::database::card_repo::PgCardRepository;
use crate::adapters::memory::MemoryCardRepository;
use crate::api::ServiceContainer;
use crate::config::{Config, StorageBackend};
use crate::services::card_repository::CardRepository;
use crate::services::card_service::CardService;
use crate::services::health_service::HealthService;
use std::sync::Arc;
use tokio::sync::watch;

/// Applies pending schema migrations.
///
/// # Errors
/// Returns an error if a migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Opens the configured card store. For Postgres this connects the pool and runs migrations.
///
/// # Errors
/// Returns an error if the Postgres backend is selected without a database URL,
/// or if connecting or migrating fails.
pub async fn init_storage(config: &Config) -> anyhow::Result<Arc<dyn CardRepository>> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("a database URL is required for the postgres storage backend"))?;
            let pool = database::init_pool(&config.storage, url).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(PgCardRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory card storage; cards will not survive a restart");
            Ok(Arc::new(MemoryCardRepository::new()))
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    repo: Option<Arc<dyn CardRepository>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, repo: None }
    }

    #[must_use]
    pub fn with_repository(mut self, repo: Arc<dyn CardRepository>) -> Self {
        self.repo = Some(repo);
        self
    }

    /// Wires the services around the card store.
    ///
    /// # Errors
    /// Returns an error if no repository was supplied.
    pub fn build(self) -> anyhow::Result<App> {
        let repo = self.repo.ok_or_else(|| anyhow::anyhow!("a card repository is required"))?;

        let card_service = CardService::new(Arc::clone(&repo));
        let health_service = HealthService::new(repo, self.config.health);

        Ok(App { services: ServiceContainer { card_service }, health_service })
    }
}

/// Routes panics through `tracing` so they reach the configured log sinks.
pub fn setup_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        tracing::error!(panic = %info, location = %location, "Thread panicked");
        default_hook(info);
    }));
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
            () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }

        let _ = shutdown_tx.send(true);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_repository() {
        assert!(AppBuilder::new(Config::default()).build().is_err());
    }

    #[tokio::test]
    async fn test_memory_storage_needs_no_database() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;

        let repo = init_storage(&config).await.unwrap();
        repo.ping().await.unwrap();

        let app = AppBuilder::new(config).with_repository(repo).build().unwrap();
        assert!(app.health_service.check_storage().await.is_ok());
    }

    #[tokio::test]
    async fn test_postgres_storage_requires_url() {
        let config = Config::default();
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert!(init_storage(&config).await.is_err());
    }
}
