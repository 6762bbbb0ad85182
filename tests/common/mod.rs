#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use pwreset::config::Config;
use pwreset::email::Mailer;
use pwreset::models::User;
use pwreset::reset::store::MemoryStore;
use pwreset::reset::ResetService;
use pwreset::state::{AppState, SharedState};

/// Captures reset emails instead of sending them.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Token from the most recent reset link.
    pub fn last_token(&self) -> String {
        let (_, link) = self.sent().pop().expect("no reset email sent");
        let query = link.split_once('?').expect("link has no query").1;
        form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "token")
            .map(|(_, v)| v.into_owned())
            .expect("link has no token")
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, to_email: &str, reset_link: &str) -> Result<(), String> {
        self.sent
            .lock()
            .unwrap()
            .push((to_email.to_string(), reset_link.to_string()));
        Ok(())
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn forgot_password(&self, email: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/forgot-password"))
            .json(&json!({ "email": email }))
            .send()
            .await
            .expect("forgot-password request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        password: &str,
        confirmation: &str,
    ) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/reset-password"))
            .json(&json!({
                "email": email,
                "token": token,
                "password": password,
                "password_confirmation": confirmation,
            }))
            .send()
            .await
            .expect("reset-password request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config(database_url: &str) -> Config {
    Config {
        database_url: database_url.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        base_url: "http://localhost:0".to_string(),
        min_password_length: 6,
        token_ttl: None,
        reset_request_limit: 5,
        reset_request_window_secs: 900,
        log_level: "warn".to_string(),
        smtp: None,
    }
}

pub fn test_user(email: &str, password: &str) -> User {
    User {
        id: Uuid::now_v7(),
        email: email.to_string(),
        name: "Test".to_string(),
        password_hash: pwreset::password::hash(password).unwrap(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn serve(state: SharedState) -> TestApp {
    let app = pwreset::build_app(state.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        state,
    }
}

/// Spawn a test app backed by the in-memory store and a recording mailer.
pub async fn spawn_memory_app(
    config: Config,
) -> (TestApp, Arc<MemoryStore>, Arc<RecordingMailer>) {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let resets = ResetService::new(
        store.clone(),
        store.clone(),
        mailer.clone(),
        config.base_url.clone(),
    )
    .with_token_ttl(config.token_ttl);

    let state: SharedState = Arc::new(AppState::new(config, resets));
    (serve(state).await, store, mailer)
}

/// A test server on its own temporary Postgres database.
pub struct PgTestApp {
    pub app: TestApp,
    pub pool: PgPool,
    pub db_name: String,
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_pg_app() -> PgTestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!("pwreset_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let state = pwreset::build_state(pool.clone(), test_config(&test_url));
    let app = serve(state).await;

    PgTestApp { app, pool, db_name }
}

/// Drop the test database after tests complete.
pub async fn cleanup(test: PgTestApp) {
    let db_name = test.db_name.clone();
    test.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
