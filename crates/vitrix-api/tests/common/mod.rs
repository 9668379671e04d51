//! Shared helpers for HTTP tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use vitrix_api::{AppState, build_app};
use vitrix_core::config::AppConfig;
use vitrix_database::memory::{MemoryAccountStore, MemoryMessageStore};
use vitrix_database::{AccountStore, Stores};
use vitrix_entity::account::{Account, DeviceToken, UserRole};
use vitrix_push::{PushError, PushGateway, PushMessage};

/// Gateway that accepts every token except the scripted failures.
#[derive(Debug, Default)]
pub struct FakeGateway {
    pub unconfigured: bool,
    pub failures: HashMap<String, String>,
    pub sent: Mutex<Vec<PushMessage>>,
}

impl FakeGateway {
    pub fn failing(mut self, token: &str, code: &str) -> Self {
        self.failures.insert(token.to_string(), code.to_string());
        self
    }

    pub fn sent_tokens(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.token().to_string())
            .collect()
    }
}

#[async_trait]
impl PushGateway for FakeGateway {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn send(&self, message: &PushMessage) -> Result<String, PushError> {
        self.sent.lock().unwrap().push(message.clone());
        match self.failures.get(message.token()) {
            Some(code) => Err(PushError::Rejected {
                status: 404,
                code: code.clone(),
                message: "Requested entity was not found.".to_string(),
            }),
            None => Ok(format!("projects/test/messages/{}", message.token())),
        }
    }
}

/// Test application context.
pub struct TestApp {
    /// The Axum app under test.
    pub router: Router,
    /// Account store behind the app.
    pub accounts: Arc<MemoryAccountStore>,
    /// Message store behind the app.
    pub messages: Arc<MemoryMessageStore>,
    /// Gateway behind the app.
    pub gateway: Arc<FakeGateway>,
    /// State, for draining background work.
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_gateway(FakeGateway::default())
    }

    pub fn with_gateway(gateway: FakeGateway) -> Self {
        let accounts = Arc::new(MemoryAccountStore::new());
        let messages = Arc::new(MemoryMessageStore::new());
        let gateway = Arc::new(gateway);
        let stores = Stores {
            accounts: accounts.clone(),
            messages: messages.clone(),
            pool: None,
        };
        let state = AppState::build(AppConfig::default(), stores, gateway.clone());

        Self {
            router: build_app(state.clone()),
            accounts,
            messages,
            gateway,
            state,
        }
    }

    /// Insert an account with the given groups and active tokens.
    pub async fn seed(
        &self,
        email: &str,
        role: UserRole,
        groups: &[&str],
        tokens: &[&str],
    ) -> Account {
        let name = email.split('@').next().unwrap_or(email).to_string();
        let mut account = Account::new(email, Some(name), role);
        for group in groups {
            account = account.in_group(*group);
        }
        self.accounts.create_account(&account).await.unwrap();
        for token in tokens {
            self.accounts
                .register_token(&DeviceToken::new(account.id, *token))
                .await
                .unwrap();
        }
        account
    }

    /// Send a request with an optional JSON body.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body = body
            .map(|b| Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap_or_else(Body::empty);
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(body)
            .unwrap();
        self.send(req).await
    }

    /// Send a raw request.
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw: bytes.to_vec(),
        }
    }

    pub async fn drain(&self) {
        self.state.notification_service.drain_background().await;
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}
