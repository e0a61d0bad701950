#![allow(dead_code)]

use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use signing_service::config::{
    DatabaseConfig, ProviderConfig, SigningConfig, MEMORY_DATABASE_URL,
};
use signing_service::services::{DocumentStore, InMemoryStore};
use signing_service::startup::Application;
use std::sync::Arc;
use wiremock::MockServer;

pub const TEST_API_TOKEN: &str = "test-api-token";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: MockServer,
    pub store: InMemoryStore,
    pub client: reqwest::Client,
}

pub fn test_config(provider_url: &str) -> SigningConfig {
    let common = CoreConfig {
        port: 0, // Random port for testing
        ..CoreConfig::default()
    };

    SigningConfig {
        common,
        provider: ProviderConfig {
            api_token: Secret::new(TEST_API_TOKEN.to_string()),
            base_url: provider_url.to_string(),
            timeout_seconds: 5,
        },
        database: DatabaseConfig {
            url: MEMORY_DATABASE_URL.to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        log_level: "debug".to_string(),
        otlp_endpoint: None,
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let provider = MockServer::start().await;
        let store = InMemoryStore::new();
        let shared: Arc<dyn DocumentStore> = Arc::new(store.clone());

        let app = Application::build_with_store(test_config(&provider.uri()), shared)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            provider,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_create(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/documento/create"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn create_body() -> Value {
    json!({
        "name": "Doc",
        "url_documento": "http://x/doc.pdf",
        "nome_signatario": "A",
        "email_signatario": "a@x.com"
    })
}

pub fn provider_document(token: &str) -> Value {
    json!({
        "open_id": 1,
        "token": token,
        "status": "pending",
        "created_by": {"email": "a@x.com"}
    })
}
