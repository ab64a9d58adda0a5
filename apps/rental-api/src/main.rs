//! 设备租赁 HTTP API
//!
//! 写操作交给 rental-ledger；读操作来自服务端自己的 SyncClient 视图，
//! 与其他客户端订阅同一条变更推送。

mod handlers;
mod middleware;
mod routes;
mod utils;

use axum::{Router, middleware as axum_middleware};
use rental_auth::{AuthService, Authenticator, JwtManager};
use rental_config::AppConfig;
use rental_ledger::RentalService;
use rental_storage::{ChangeFeed, InMemoryBackend, PgBackend, Stores};
use rental_sync::SyncClient;
use rental_telemetry::init_tracing;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn Authenticator>,
    pub service: RentalService,
    pub sync: Arc<SyncClient>,
    pub feed: Arc<ChangeFeed>,
    /// 写操作后等待回显的最长时间
    pub echo_timeout: Duration,
}

impl AppState {
    pub fn new(stores: &Stores, jwt: JwtManager, echo_timeout: Duration) -> Self {
        Self {
            auth: Arc::new(AuthService::new(stores.actors.clone(), jwt)),
            service: RentalService::new(stores),
            sync: Arc::new(SyncClient::connect(&stores.feed)),
            feed: stores.feed.clone(),
            echo_timeout,
        }
    }
}

/// 组装完整应用（路由 + 请求上下文 + HTTP 追踪）。
pub fn build_app(state: AppState) -> Router {
    routes::create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(axum_middleware::from_fn(middleware::request_context))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    // 未配置数据库时使用内存后端；后端对象需存活到进程结束
    let (stores, _memory, _changefeed) = match config.database_url.as_deref() {
        Some(database_url) => {
            let backend = PgBackend::connect(database_url, config.db_max_connections).await?;
            backend.migrate().await?;
            let changefeed = backend.spawn_changefeed();
            info!(target: "rental.api", "using postgres backend");
            (backend.stores(), None, Some(changefeed))
        }
        None => {
            let backend = InMemoryBackend::new();
            warn!(target: "rental.api", "RENTAL_DATABASE_URL not set, using in-memory backend");
            (backend.stores(), Some(backend), None)
        }
    };

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_ttl_seconds);
    let state = AppState::new(
        &stores,
        jwt,
        Duration::from_millis(config.sync_echo_timeout_ms),
    );

    if let Some(bootstrap) = &config.bootstrap_manager {
        match state
            .service
            .actors
            .bootstrap_manager(&bootstrap.username, &bootstrap.password)
            .await?
        {
            Some(actor) => info!(target: "rental.api", username = %actor.username, "bootstrap manager created"),
            None => info!(target: "rental.api", "actors present, bootstrap skipped"),
        }
    }

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(target: "rental.api", addr = %config.http_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
