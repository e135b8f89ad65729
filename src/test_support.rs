//! In-memory doubles for the store and geocoder, plus a request helper that
//! drives the full router.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_app,
    auth::{
        repo::AccountRepo,
        repo_types::{Account, NewAccount},
    },
    geocoder::{Coordinates, Geocoder},
    points::{
        repo::PointRepo,
        repo_types::{NewPoint, Point, PointFilter, PointOwner, PointWithOwner},
    },
    state::AppState,
};

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    points: Vec<Point>,
}

/// Store double for both repos. Enforces email uniqueness like the real
/// schema does.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_next: Mutex<Option<String>>,
    point_creates: AtomicUsize,
}

impl MemoryStore {
    /// Make the next store call fail with `message`.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    pub fn account_count(&self) -> usize {
        self.tables.lock().unwrap().accounts.len()
    }

    /// Number of times `PointRepo::create` was invoked.
    pub fn point_creates(&self) -> usize {
        self.point_creates.load(Ordering::SeqCst)
    }

    fn injected_failure(&self) -> anyhow::Result<()> {
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(anyhow::anyhow!(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AccountRepo for MemoryStore {
    async fn create(&self, new: NewAccount) -> anyhow::Result<Account> {
        self.injected_failure()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.accounts.iter().any(|a| a.email == new.email) {
            anyhow::bail!("email {} already registered", new.email);
        }
        let account = Account {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            kind: new.kind,
        };
        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        self.injected_failure()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.accounts.iter().find(|a| a.email == email).cloned())
    }
}

#[async_trait]
impl PointRepo for MemoryStore {
    async fn create(&self, new: NewPoint) -> anyhow::Result<Point> {
        self.point_creates.fetch_add(1, Ordering::SeqCst);
        self.injected_failure()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.accounts.iter().any(|a| a.id == new.owner_id) {
            anyhow::bail!("owner {} does not exist", new.owner_id);
        }
        let point = Point {
            id: Uuid::new_v4(),
            name: new.name,
            street: new.street,
            neighborhood: new.neighborhood,
            city: new.city,
            latitude: new.latitude,
            longitude: new.longitude,
            kind: new.kind,
            owner_id: new.owner_id,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.points.push(point.clone());
        Ok(point)
    }

    async fn list(&self, filter: PointFilter) -> anyhow::Result<Vec<PointWithOwner>> {
        self.injected_failure()?;
        let tables = self.tables.lock().unwrap();
        let rows = tables
            .points
            .iter()
            .filter(|p| filter.matches(&p.kind))
            .filter_map(|p| {
                let owner = tables.accounts.iter().find(|a| a.id == p.owner_id)?;
                Some(PointWithOwner {
                    point: p.clone(),
                    owner: PointOwner {
                        id: owner.id,
                        name: owner.name.clone(),
                        email: owner.email.clone(),
                        cnpj: owner.kind.cnpj().map(str::to_owned),
                    },
                })
            })
            .collect();
        Ok(rows)
    }
}

enum Reply {
    Found(Coordinates),
    NotFound,
    Fail(String),
}

/// Geocoder double with a fixed reply; records every query it receives.
pub struct StubGeocoder {
    reply: Reply,
    queries: Mutex<Vec<String>>,
}

impl StubGeocoder {
    fn with(reply: Reply) -> Self {
        Self {
            reply,
            queries: Mutex::default(),
        }
    }

    pub fn found(lat: f64, lng: f64) -> Self {
        Self::with(Reply::Found(Coordinates { lat, lng }))
    }

    pub fn not_found() -> Self {
        Self::with(Reply::NotFound)
    }

    pub fn failing(message: &str) -> Self {
        Self::with(Reply::Fail(message.to_string()))
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn locate(&self, query: &str) -> anyhow::Result<Option<Coordinates>> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.reply {
            Reply::Found(c) => Ok(Some(*c)),
            Reply::NotFound => Ok(None),
            Reply::Fail(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}

/// Send one request through the router and return status and raw body.
pub async fn call_raw(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = build_app(state.clone())
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Like [`call_raw`] but parses the body as JSON.
pub async fn call(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, text) = call_raw(state, method, uri, body).await;
    (status, serde_json::from_str(&text).unwrap())
}
