//! Shared harness for router tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use clinic_api::{build_router, ApiConfig, AppState, Hs256Gate, IdentityGate, Role, Store};
use clinic_core::{AccountFields, AccountService, SqliteAccountRepository};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Store,
    pub gate: Hs256Gate,
    _dir: TempDir,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Router whose token secret is not configured.
    pub fn without_secret() -> Self {
        Self::build(false)
    }

    fn build(with_secret: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("api.sqlite3"), 4).unwrap();
        let gate = Hs256Gate::new(SECRET, 300).unwrap();
        let identity: Option<Arc<dyn IdentityGate>> = if with_secret {
            Some(Arc::new(gate.clone()))
        } else {
            None
        };
        let router = build_router(AppState::new(store.clone(), identity), &ApiConfig::default());
        Self {
            router,
            store,
            gate,
            _dir: dir,
        }
    }

    pub fn admin_token(&self) -> String {
        self.gate.issue(1, Role::Admin).unwrap()
    }

    pub fn patient_token(&self, account_id: i64) -> String {
        self.gate.issue(account_id, Role::Patient).unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.dispatch(request).await
    }

    /// Sends a prebuilt request, for callers that need custom headers.
    pub async fn dispatch(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply {
            status,
            headers,
            json,
        }
    }

    /// Provisions an account directly in storage and returns its id.
    pub async fn seed_account(&self, username: &str, role: &str) -> i64 {
        let fields = AccountFields {
            username: username.to_string(),
            name: format!("{username} test"),
            role: role.to_string(),
        };
        self.store
            .run(move |conn| {
                AccountService::new(SqliteAccountRepository::try_new(conn).unwrap())
                    .create_account(&fields)
                    .unwrap()
                    .id
            })
            .await
            .unwrap()
    }

    /// Creates `count` catalog slots as admin and returns their ids.
    pub async fn seed_slots(&self, count: usize) -> Vec<i64> {
        let token = self.admin_token();
        let days = ["monday", "tuesday", "wednesday", "thursday", "friday"];
        let mut ids = Vec::with_capacity(count);
        for idx in 0..count {
            let hour = 8 + idx / days.len();
            let reply = self
                .send(
                    Method::POST,
                    "/api/slots",
                    Some(&token),
                    Some(serde_json::json!({
                        "day": days[idx % days.len()],
                        "start": format!("{hour:02}:00"),
                        "end": format!("{hour:02}:45"),
                    })),
                )
                .await;
            assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.json);
            ids.push(reply.json["result"]["slotId"].as_i64().unwrap());
        }
        ids
    }
}

pub fn practitioner_body(name: &str, slot_ids: &[i64]) -> Value {
    serde_json::json!({
        "name": name,
        "specialty": "Cardio",
        "gender": "F",
        "phone": "123",
        "biography": "bio",
        "facility": "Hosp",
        "slotIds": slot_ids,
    })
}

pub fn slot_ids_of(record: &Value) -> Vec<i64> {
    record["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot["slotId"].as_i64().unwrap())
        .collect()
}
