/// Common test utilities for API tests
///
/// Builds the full router over the in-memory backend, so no external
/// services are needed, and provides JSON request helpers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tasktrack_api::app::{build_router, AppState};
use tasktrack_api::config::Config;
use tasktrack_shared::db::memory::MemoryRepository;
use tower::Service as _;

pub const JWT_SECRET: &str = "api-test-secret-at-least-32-bytes-long";
pub const PASSWORD: &str = "correct horse battery";

/// Router plus the repository behind it
pub struct TestContext {
    pub app: axum::Router,
    pub repo: Arc<MemoryRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_vars(&[])
    }

    /// Builds the app with extra configuration variables
    pub fn with_vars(extra: &[(&str, &str)]) -> Self {
        let mut vars = vec![("STORAGE_BACKEND", "memory"), ("JWT_SECRET", JWT_SECRET)];
        vars.extend_from_slice(extra);

        let config = Config::from_lookup(|key| {
            vars.iter()
                .rev()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .expect("valid test configuration");

        let repo = Arc::new(MemoryRepository::new());
        let app = build_router(AppState::new(repo.clone(), config));

        Self { app, repo }
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// An empty or non-JSON body is returned as `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Registers a user and returns their access token
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": PASSWORD,
                    "name": "Test User",
                    "country": "NL"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        body["access_token"].as_str().unwrap().to_string()
    }

    /// Creates a project and returns its ID
    pub async fn create_project(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/projects",
                Some(token),
                Some(json!({ "title": title, "description": "test project" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create project failed: {}", body);

        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a task and returns its JSON
    pub async fn create_task(&self, token: &str, project: &str, title: &str, status: Option<&str>) -> Value {
        let mut body = json!({ "project": project, "title": title });
        if let Some(status) = status {
            body["status"] = json!(status);
        }

        let (code, body) = self.send("POST", "/api/tasks", Some(token), Some(body)).await;
        assert_eq!(code, StatusCode::CREATED, "create task failed: {}", body);
        body
    }
}
