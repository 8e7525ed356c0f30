#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use quota_shortener::application::services::auth_service::Claims;
use quota_shortener::application::services::{AuthService, LinkService, UserService};
use quota_shortener::config::Limits;
use quota_shortener::domain::safety::UrlSafetyChecker;
use quota_shortener::error::AppError;
use quota_shortener::infrastructure::cache::{CacheService, NullCache};
use quota_shortener::infrastructure::persistence::{InMemoryStore, Repositories};
use quota_shortener::routes::build_router;
use quota_shortener::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const TEST_SECRET: &str = "test-signing-secret";

/// Flags any URL containing one of the listed fragments.
pub struct DenyListChecker {
    fragments: Vec<String>,
}

impl DenyListChecker {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[async_trait]
impl UrlSafetyChecker for DenyListChecker {
    async fn is_unsafe(&self, url: &str) -> Result<bool, AppError> {
        Ok(self.fragments.iter().any(|f| url.contains(f.as_str())))
    }
}

/// A running app over a fresh in-memory store.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub users: UserService,
}

impl TestApp {
    /// Registers a quota record and returns a bearer token for it.
    pub async fn register(&self, user_uuid: &str) -> String {
        self.users.register(user_uuid).await.unwrap();
        token_for(user_uuid)
    }
}

pub fn create_test_state(store: Arc<InMemoryStore>, limits: Limits) -> AppState {
    let repositories = Repositories::from_store(store);
    let cache: Arc<dyn CacheService> = Arc::new(NullCache::new());

    let link_service = Arc::new(LinkService::new(
        repositories.quotas,
        repositories.links.clone(),
        repositories.analytics,
        Arc::new(DenyListChecker::new(&["malware.test"])),
        cache.clone(),
        limits.clone(),
    ));

    AppState {
        link_service,
        auth_service: Arc::new(AuthService::new(TEST_SECRET)),
        cache,
        links: repositories.links,
        limits,
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(Limits::default())
}

pub fn spawn_app_with(limits: Limits) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let state = create_test_state(store.clone(), limits);
    let server = TestServer::new(build_router(state, false)).unwrap();

    TestApp {
        server,
        users: UserService::new(store.clone()),
        store,
    }
}

pub fn token_for(user_uuid: &str) -> String {
    signed_token(Some(user_uuid), Duration::hours(1), TEST_SECRET)
}

pub fn signed_token(username: Option<&str>, expires_in: Duration, secret: &str) -> String {
    let claims = Claims {
        username: username.map(str::to_string),
        exp: (Utc::now() + expires_in).timestamp() as u64,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Inserts a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
