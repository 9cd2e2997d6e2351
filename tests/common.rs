use std::process::Command;
use std::sync::{Arc, Once};
use tokio::net::TcpListener;
use wedfeed_api_kernel::cache::{DynCache, InMemoryCache};
use wedfeed_api_kernel::db;
use wedfeed_api_kernel::kernel::build_app;
use wedfeed_api_kernel::realtime::EventHub;

static JWT_INIT: Once = Once::new();
pub const JWT_SECRET_CONST: &str = "wedfeed-test-secret";

pub struct TestDbGuard {
    maintenance_url: String,
    unique_db: String,
}

impl TestDbGuard {
    pub fn new(maintenance_url: String, unique_db: String) -> Self {
        Self { maintenance_url, unique_db }
    }
}

impl Drop for TestDbGuard {
    fn drop(&mut self) {
        let _ = Command::new("psql")
            .arg(&self.maintenance_url)
            .arg("-c")
            .arg(format!(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}' AND pid <> pg_backend_pid();",
                self.unique_db
            ))
            .status();
        let _ = Command::new("psql")
            .arg(&self.maintenance_url)
            .arg("-c")
            .arg(format!("DROP DATABASE IF EXISTS \"{}\"", self.unique_db))
            .status();
    }
}

pub async fn create_test_db_and_pool(test_db: &str) -> anyhow::Result<(sqlx::PgPool, TestDbGuard)> {
    let maintenance = test_db.to_string();
    let mut maintenance_url = maintenance.clone();
    if let Some(idx) = maintenance_url.rfind('/') {
        maintenance_url.replace_range(idx + 1.., "postgres");
    }
    let base_db_name = test_db.rsplit('/').next().unwrap().split('?').next().unwrap();
    let unique_db = format!("{}_{}", base_db_name, uuid::Uuid::new_v4().to_string().replace('-', ""));
    let mut unique_db_url = test_db.to_string();
    if let Some(idx) = unique_db_url.rfind('/') {
        unique_db_url.replace_range(idx + 1.., &unique_db);
    }
    let _ = Command::new("psql").arg(&maintenance_url).arg("-c").arg(format!("DROP DATABASE IF EXISTS \"{}\"", unique_db)).status();
    let _ = Command::new("psql").arg(&maintenance_url).arg("-c").arg(format!("CREATE DATABASE \"{}\"", unique_db)).status();
    let _ = Command::new("psql").arg(&unique_db_url).arg("-c").arg("CREATE EXTENSION IF NOT EXISTS pgcrypto;").status();
    let guard = TestDbGuard::new(maintenance_url.clone(), unique_db.clone());
    JWT_INIT.call_once(|| {
        std::env::set_var("JWT_SECRET", JWT_SECRET_CONST);
    });
    let pool = db::init_db(&unique_db_url).await?;
    Ok((pool, guard))
}

pub async fn spawn_app_with_plugins(plugins: Vec<Box<dyn wedfeed_api_kernel::kernel::Plugin>>) -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    let app = build_app(&plugins, None).await;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });
    Ok((format!("http://{}", addr), server_handle))
}

/// The full plugin set every feed test needs: events, guests, auth and the
/// feed plugins sharing one hub and an in-memory cache.
pub fn full_plugins(pool: sqlx::PgPool) -> (Vec<Box<dyn wedfeed_api_kernel::kernel::Plugin>>, Arc<EventHub>) {
    let hub = Arc::new(EventHub::new());
    let cache: DynCache = InMemoryCache::new(64).into_arc();
    let plugins: Vec<Box<dyn wedfeed_api_kernel::kernel::Plugin>> = vec![
        Box::new(wedfeed_api_kernel::plugins::health::HealthPlugin),
        Box::new(wedfeed_api_kernel::plugins::events::EventsPlugin::new(pool.clone())),
        Box::new(wedfeed_api_kernel::plugins::guests::GuestsPlugin::new(pool.clone())),
        Box::new(wedfeed_api_kernel::plugins::auth::AuthPlugin::new(pool.clone())),
        Box::new(wedfeed_api_kernel::plugins::feed::posts::plugin::PostsPlugin::new(pool.clone(), hub.clone())),
        Box::new(wedfeed_api_kernel::plugins::feed::stories::plugin::StoriesPlugin::new(pool.clone(), hub.clone(), cache)),
        Box::new(wedfeed_api_kernel::plugins::feed::upload::UploadPlugin::new()),
        Box::new(wedfeed_api_kernel::plugins::realtime::RealtimePlugin::new(hub.clone())),
    ];
    (plugins, hub)
}

pub async fn setup_and_spawn(test_db: &str) -> anyhow::Result<(String, tokio::task::JoinHandle<()>, sqlx::PgPool, TestDbGuard)> {
    let (pool, guard) = create_test_db_and_pool(test_db).await?;
    let (plugins, _hub) = full_plugins(pool.clone());
    let (base, server_handle) = spawn_app_with_plugins(plugins).await?;
    Ok((base, server_handle, pool, guard))
}

/// Creates an event, registers a guest in it and logs in. Returns the token
/// plus the event and guest ids.
pub async fn register_and_login(
    client: &reqwest::Client,
    base: &str,
    event_code: &str,
    username: &str,
) -> anyhow::Result<(String, uuid::Uuid, uuid::Uuid)> {
    // create the event unless an earlier guest already did
    let create_event = client.post(format!("{}/events", base))
        .json(&serde_json::json!({"name": format!("wedding {}", event_code), "event_code": event_code}))
        .send()
        .await?;
    let event_id: uuid::Uuid = if create_event.status().is_success() {
        let body: serde_json::Value = create_event.json().await?;
        body["id"].as_str().unwrap().parse()?
    } else {
        let list: serde_json::Value = client.get(format!("{}/events", base)).send().await?.json().await?;
        let found = list.as_array().unwrap().iter()
            .find(|e| e["event_code"] == event_code)
            .expect("event exists");
        found["id"].as_str().unwrap().parse()?
    };

    let register = client.post(format!("{}/guests", base))
        .json(&serde_json::json!({
            "event_code": event_code,
            "username": username,
            "display_name": username,
            "password": "password123"
        }))
        .send()
        .await?;
    anyhow::ensure!(register.status().is_success(), "guest registration failed: {}", register.status());
    let guest: serde_json::Value = register.json().await?;
    let guest_id: uuid::Uuid = guest["id"].as_str().unwrap().parse()?;

    let login = client.post(format!("{}/auth/login", base))
        .json(&serde_json::json!({"event_code": event_code, "username": username, "password": "password123"}))
        .send()
        .await?;
    anyhow::ensure!(login.status().is_success(), "login failed: {}", login.status());
    let body: serde_json::Value = login.json().await?;
    let token = body["token"].as_str().unwrap().to_string();

    Ok((token, event_id, guest_id))
}
