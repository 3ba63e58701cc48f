//! Shared test infrastructure for in-process API tests.
//!
//! The router is driven with `tower::ServiceExt::oneshot`; sources are
//! `MockSource`s and the store is a SQLite file in a temporary directory.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use litscout_core::{
    testing::MockSource, Config, CredentialProvider, DatabaseConfig, OpportunityStore,
    ServerConfig, SourceId, SourceRegistry, SqliteStore, StaticCredentials,
};

pub use litscout_core::testing::fixtures;

/// Session used by the request helpers.
pub const SESSION: &str = "test-session";

pub struct TestFixture {
    pub router: Router,
    pub google: MockSource,
    pub bing: MockSource,
    pub temp_dir: TempDir,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::build(true).await
    }

    /// Fixture whose server runs without persistence.
    pub async fn without_store() -> Self {
        Self::build(false).await
    }

    async fn build(with_store: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let google = MockSource::new(SourceId::Google).with_results(vec![
            fixtures::raw("Prêmio Palmas de Poesia", "Palmas, TO"),
            fixtures::raw("Edital Paulista de Contos", "São Paulo, SP"),
        ]);
        let bing = MockSource::new(SourceId::Bing)
            .with_results(vec![fixtures::raw("Concurso Nacional de Crônicas", "Nacional")]);

        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(google.clone()));
        registry.register(Arc::new(bing.clone()));

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
                enabled: with_store,
            },
            ..Default::default()
        };

        let store: Option<Arc<dyn OpportunityStore>> = if with_store {
            Some(Arc::new(
                SqliteStore::new(&db_path).expect("Failed to create store"),
            ))
        } else {
            None
        };

        let credentials: Arc<dyn CredentialProvider> =
            Arc::new(StaticCredentials::new().with(SourceId::Google, "GOOGLE_API_KEY", "test-key"));

        let state = Arc::new(litscout_server::state::AppState::new(
            config,
            Arc::new(registry),
            credentials,
            store,
        ));

        let router = litscout_server::api::create_router(state);

        Self {
            router,
            google,
            bing,
            temp_dir,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, Some(SESSION)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), Some(SESSION)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body), Some(SESSION)).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None, Some(SESSION)).await
    }

    /// Send a request as another caller (`None` sends no session header).
    pub async fn request_as(
        &self,
        session: Option<&str>,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> TestResponse {
        self.request(method, path, body, session).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-Session-Id", SESSION)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// GET returning the raw text body (for the Prometheus endpoint).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);
        if let Some(session) = session {
            request_builder = request_builder.header("X-Session-Id", session);
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
