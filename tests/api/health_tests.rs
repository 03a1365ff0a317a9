//! Health Check API Tests

use async_trait::async_trait;
use axum::http::StatusCode;
use std::sync::Arc;

use chat_service::infrastructure::health::DependencyProbe;
use chat_service::startup::InMemoryBackends;

use crate::common::{body_json, TestApp};

struct FixedProbe {
    name: &'static str,
    critical: bool,
    up: bool,
}

#[async_trait]
impl DependencyProbe for FixedProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn critical(&self) -> bool {
        self.critical
    }

    async fn check(&self) -> Result<(), String> {
        if self.up {
            Ok(())
        } else {
            Err(format!("{} unreachable", self.name))
        }
    }
}

async fn app_with_probes(probes: Vec<FixedProbe>) -> TestApp {
    let backends = InMemoryBackends::default();
    let mut collaborators = backends.collaborators();
    collaborators.probes = probes
        .into_iter()
        .map(|p| Arc::new(p) as Arc<dyn DependencyProbe>)
        .collect();
    TestApp::with_collaborators(backends, collaborators).await
}

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new().await;

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "alive");
}

#[tokio::test]
async fn test_readiness_degraded_when_search_down() {
    let app = app_with_probes(vec![
        FixedProbe { name: "database", critical: true, up: true },
        FixedProbe { name: "search", critical: false, up: false },
    ])
    .await;

    let response = app.get("/health/ready").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["search"]["status"], "unhealthy");
    assert_eq!(body["checks"]["search"]["message"], "search unreachable");
}

#[tokio::test]
async fn test_readiness_unavailable_when_database_down() {
    let app = app_with_probes(vec![FixedProbe { name: "database", critical: true, up: false }]).await;

    let response = app.get("/health/ready").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "unhealthy");
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_allocations() {
    let app = TestApp::new().await;
    app.create_chat("metrics-app").await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("chat_service_sequence_allocations_total"));
}
