//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::time::Duration;

use axum::{body::Body, http::Request, response::Response, Router};
use chat_service::application::fanout::FanoutDispatcher;
use chat_service::config::{
    Backend, CorsSettings, DatabaseSettings, EventSettings, FanoutSettings, RedisSettings,
    SearchSettings, ServerSettings, Settings,
};
use chat_service::presentation::http::create_router;
use chat_service::startup::{build_state, AppState, Collaborators, InMemoryBackends};
use tower::ServiceExt;

/// Test application over in-memory backends
pub struct TestApp {
    pub router: Router,
    pub backends: InMemoryBackends,
    pub state: AppState,
    fanout: Option<FanoutDispatcher>,
}

impl TestApp {
    pub async fn new() -> Self {
        let backends = InMemoryBackends::default();
        Self::with_collaborators(backends.clone(), backends.collaborators()).await
    }

    /// Build over custom collaborators, e.g. with extra readiness probes.
    pub async fn with_collaborators(backends: InMemoryBackends, collaborators: Collaborators) -> Self {
        let (state, fanout) = build_state(collaborators, &test_settings());
        Self {
            router: create_router(state.clone()),
            backends,
            state,
            fanout: Some(fanout),
        }
    }

    /// Wait for every queued side effect, then stop the fan-out pool.
    pub async fn drain(&mut self) {
        if let Some(fanout) = self.fanout.take() {
            assert!(fanout.shutdown(Duration::from_secs(5)).await, "fan-out did not drain");
        }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a POST request without a body
    pub async fn post(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Create a chat and return its number
    pub async fn create_chat(&self, token: &str) -> i64 {
        let response = self.post(&format!("/applications/{}/chats", token)).await;
        assert_eq!(response.status(), 201);
        body_json(response).await["chat_number"].as_i64().unwrap()
    }

    /// Create a message and return its number
    pub async fn create_message(&self, token: &str, chat: i64, body: &str) -> i64 {
        let payload = serde_json::json!({ "body": body }).to_string();
        let response = self
            .post_json(&format!("/applications/{}/chats/{}/messages", token, chat), &payload)
            .await;
        assert_eq!(response.status(), 201);
        body_json(response).await["message_number"].as_i64().unwrap()
    }
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

/// Generate a unique application token
pub fn unique_token() -> String {
    format!("app_{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
}

/// Settings for tests; nothing here is contacted.
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
            shutdown_timeout_secs: 5,
        },
        database: DatabaseSettings {
            url: "postgres://unused".into(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout: 1,
            run_migrations: false,
        },
        redis: RedisSettings {
            url: "redis://unused".into(),
            key_prefix: None,
        },
        search: SearchSettings {
            url: "http://unused".into(),
            collection: "messages".into(),
            max_results: 10,
            request_timeout_secs: 1,
            connect_retries: 1,
            retry_delay_secs: 0,
            refresh_on_index: true,
        },
        events: EventSettings {
            chat_created_topic: "chat_created".into(),
            message_created_topic: "message_created".into(),
            stream_max_len: 1000,
        },
        fanout: FanoutSettings {
            workers: 2,
            queue_capacity: 256,
            task_timeout_ms: 1000,
        },
        cors: CorsSettings {
            allowed_origins: Vec::new(),
        },
        backend: Backend::Memory,
        environment: "test".into(),
    }
}
