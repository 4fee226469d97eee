#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use recipes_api::{
    config::Config,
    crypto::token::Clock,
    error::{AppError, Result},
    models::{
        recipe::{Recipe, RecipeDraft},
        user::User,
    },
    repositories::{
        cache::SnapshotCache,
        recipe::RecipeStore,
        user::{CredentialStore, InsertOutcome},
    },
    routes::build_router,
    state::AppState,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;
use zeroize::Zeroizing;

/// 2024-01-01 00:00:00 UTC
pub const T0: i64 = 1_704_067_200;

/// A clock that only moves when told to.
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    pub fn new(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn secs(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.secs(), 0).unwrap()
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    users: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(user_name).cloned())
    }

    async fn insert_if_absent(&self, user: &User) -> Result<InsertOutcome> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.user_name) {
            return Ok(InsertOutcome::Conflict);
        }
        users.insert(user.user_name.clone(), user.clone());
        Ok(InsertOutcome::Created)
    }
}

/// A recipe store that counts full-collection reads.
#[derive(Default)]
pub struct MemoryRecipeStore {
    recipes: Mutex<Vec<Recipe>>,
    list_calls: AtomicUsize,
}

impl MemoryRecipeStore {
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn list_all(&self) -> Result<Vec<Recipe>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.recipes.lock().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>> {
        Ok(self.recipes.lock().await.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, recipe: &Recipe) -> Result<()> {
        self.recipes.lock().await.push(recipe.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, draft: &RecipeDraft) -> Result<bool> {
        let mut recipes = self.recipes.lock().await;
        match recipes.iter_mut().find(|r| r.id == id) {
            Some(recipe) => {
                recipe.name = draft.name.clone();
                recipe.tags = draft.tags.clone();
                recipe.ingredients = draft.ingredients.clone();
                recipe.instructions = draft.instructions.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut recipes = self.recipes.lock().await;
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        Ok(recipes.len() != before)
    }

    async fn search_by_tag(&self, tag: &str) -> Result<Vec<Recipe>> {
        let tag = tag.to_lowercase();
        Ok(self
            .recipes
            .lock()
            .await
            .iter()
            .filter(|r| r.tags.iter().any(|t| t.to_lowercase() == tag))
            .cloned()
            .collect())
    }
}

/// A cache that can be switched into an unavailable state.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    reads_fail: AtomicBool,
    deletes_fail: AtomicBool,
}

impl MemoryCache {
    pub fn fail_reads(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.deletes_fail.store(fail, Ordering::SeqCst);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().await.contains_key(key)
    }

    pub async fn put_raw(&self, key: &str, payload: &str) {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), payload.to_string());
    }
}

fn unavailable() -> AppError {
    AppError::Internal("cache unavailable".to_string())
}

#[async_trait]
impl SnapshotCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, payload: &str) -> Result<()> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.put_raw(key, payload).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.deletes_fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused@localhost/unused".to_string(),
        redis_url: "redis://127.0.0.1:6379".to_string(),
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origin: None,
        rate_limit_auth: false,
        jwt_secret: Zeroizing::new(b"integration-test-secret".to_vec()),
    }
}

/// The full router over in-memory backends.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryRecipeStore>,
    pub cache: Arc<MemoryCache>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let store = Arc::new(MemoryRecipeStore::default());
        let cache = Arc::new(MemoryCache::default());

        let state = AppState::with_backends(
            config,
            Arc::new(MemoryCredentialStore::default()),
            store.clone(),
            cache.clone(),
            clock.clone(),
        )
        .unwrap();

        let router = build_router(state.clone()).unwrap();

        Self {
            router,
            state,
            clock,
            store,
            cache,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();

        TestResponse { status, bytes }
    }

    /// Signs up and returns the token.
    pub async fn sign_up(&self, user_name: &str, password: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/signup",
                None,
                Some(serde_json::json!({ "user_name": user_name, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "sign-up failed");
        response.json()["token"].as_str().unwrap().to_string()
    }

    pub async fn create_recipe(&self, token: &str, name: &str, tags: &[&str]) -> Value {
        let response = self
            .send(
                Method::POST,
                "/recipes",
                Some(token),
                Some(serde_json::json!({
                    "name": name,
                    "tags": tags,
                    "ingredients": ["flour", "water"],
                    "instructions": ["mix", "bake"],
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "create failed");
        response.json()
    }
}
