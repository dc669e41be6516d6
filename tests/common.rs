#![allow(dead_code)]

use async_trait::async_trait;
use card_server::api::MgmtState;
use card_server::config::{Config, StorageBackend};
use card_server::domain::card::Card;
use card_server::domain::role::Role;
use card_server::error::{AppError, Result};
use card_server::services::card_repository::CardRepository;
use card_server::{AppBuilder, init_storage};
use serde_json::{Value, json};
use std::sync::{Arc, Once};
use tokio::net::TcpListener;
use tokio::sync::watch;
use uuid::Uuid;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("card_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

pub fn get_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.mgmt_port = 0;
    config.storage.backend = StorageBackend::Memory;
    config
}

/// A card store whose every call fails, standing in for an unreachable database.
#[derive(Debug, Default)]
pub struct FailingCardRepository;

#[async_trait]
impl CardRepository for FailingCardRepository {
    async fn insert(&self, _card: &Card) -> Result<Card> {
        Err(AppError::Internal)
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Card>> {
        Err(AppError::Internal)
    }

    async fn find_by_receiver(&self, _role: Role) -> Result<Vec<Card>> {
        Err(AppError::InternalMsg("connection refused by 10.0.0.7:5432".into()))
    }

    async fn find_unread_by_receiver(&self, _role: Role) -> Result<Vec<Card>> {
        Err(AppError::Internal)
    }

    async fn count_unread_by_receiver(&self, _role: Role) -> Result<u64> {
        Err(AppError::Internal)
    }

    async fn save_all(&self, _cards: &[Card]) -> Result<()> {
        Err(AppError::Internal)
    }

    async fn ping(&self) -> Result<()> {
        Err(AppError::Internal)
    }
}

pub struct TestApp {
    pub config: Config,
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub shutdown_tx: watch::Sender<bool>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        setup_tracing();

        let repo = init_storage(&config).await.expect("Failed to initialize storage");
        Self::spawn_with_repository(config, repo).await
    }

    pub async fn spawn_with_repository(config: Config, repo: Arc<dyn CardRepository>) -> Self {
        setup_tracing();

        let app = AppBuilder::new(config.clone()).with_repository(repo).build().expect("Failed to build app");

        let app_router = card_server::api::app_router(&config, app.services);
        let mgmt_router = card_server::api::mgmt_router(MgmtState { health_service: app.health_service });

        let api_listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port)).await.unwrap();
        let mgmt_listener =
            TcpListener::bind(format!("{}:{}", config.server.host, config.server.mgmt_port)).await.unwrap();
        let api_addr = api_listener.local_addr().unwrap();
        let mgmt_addr = mgmt_listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut api_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            axum::serve(api_listener, app_router.into_make_service())
                .with_graceful_shutdown(async move {
                    let _ = api_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });

        let mut mgmt_rx = shutdown_rx;
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_router.into_make_service())
                .with_graceful_shutdown(async move {
                    let _ = mgmt_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });

        Self {
            config,
            server_url: format!("http://{api_addr}"),
            mgmt_url: format!("http://{mgmt_addr}"),
            client: reqwest::Client::new(),
            shutdown_tx,
        }
    }

    pub async fn send_card(&self, sender_role: &str, card_type: &str) -> Value {
        let resp = self
            .client
            .post(format!("{}/api/cards", self.server_url))
            .json(&json!({
                "senderRole": sender_role,
                "cardType": card_type,
                "title": card_type.to_uppercase(),
                "icon": "heart.fill",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let resp = self.client.get(format!("{}{path}", self.server_url)).send().await.unwrap();
        assert_eq!(resp.status(), 200, "GET {path}");
        resp.json().await.unwrap()
    }

    pub async fn unread_count(&self, role: &str) -> u64 {
        self.get_json(&format!("/api/cards/{role}/unread-count")).await["count"].as_u64().unwrap()
    }

    pub async fn mark_read(&self, card_id: &str) -> reqwest::Response {
        self.client.put(format!("{}/api/cards/{card_id}/read", self.server_url)).send().await.unwrap()
    }

    pub async fn mark_all_read(&self, role: &str) -> reqwest::Response {
        self.client.put(format!("{}/api/cards/{role}/read-all", self.server_url)).send().await.unwrap()
    }
}
