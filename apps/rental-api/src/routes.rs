//! 路由定义
//!
//! - 健康检查：/health
//! - 认证：/login
//! - 操作者：/actors
//! - 设备：/assets/*
//! - 租赁：/assets/{id}/rentals（开租）、/assets/{id}/return（归还）、/rentals
//! - 活动日志、看板统计、计数器：/activity、/stats、/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post, put},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/actors", get(list_actors).post(create_actor))
        .route("/assets", get(list_assets).post(create_asset))
        .route(
            "/assets/:asset_id",
            put(update_asset).delete(delete_asset),
        )
        .route("/assets/:asset_id/status", put(set_asset_status))
        .route("/assets/:asset_id/rentals", post(open_rental))
        .route("/assets/:asset_id/return", post(close_rental))
        .route("/rentals", get(list_rentals))
        .route("/activity", get(list_activity))
        .route("/stats", get(get_stats))
        .route("/metrics", get(get_metrics))
}

#[cfg(test)]
mod tests {
    use crate::{AppState, build_app};
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use rental_auth::JwtManager;
    use rental_ledger::RentalService;
    use rental_storage::{InMemoryBackend, ManualClock};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const HOUR_MS: i64 = 3_600_000;

    struct Harness {
        app: Router,
        clock: Arc<ManualClock>,
        _backend: InMemoryBackend,
    }

    async fn harness() -> Harness {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let backend = InMemoryBackend::with_clock(clock.clone());
        let stores = backend.stores();
        let service = RentalService::new(&stores);
        service
            .actors
            .bootstrap_manager("boss", "boss-pw")
            .await
            .unwrap();
        let jwt = JwtManager::new("test-secret".to_string(), 600);
        let state = AppState::new(&stores, jwt, Duration::from_secs(2));
        Harness {
            app: build_app(state),
            clock,
            _backend: backend,
        }
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn login(app: &Router, username: &str, password: &str) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["accessToken"].as_str().unwrap().to_string()
    }

    async fn create_drill(app: &Router, token: &str) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/assets",
            Some(token),
            Some(json!({ "name": "Hammer Drill", "hourlyRate": 10.0, "dailyRate": 70.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["assetId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public_and_tagged() {
        let h = harness().await;
        let response = h
            .app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert!(response.headers().contains_key("x-trace-id"));
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let h = harness().await;
        let (status, body) = call(&h.app, Method::GET, "/assets", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "AUTH.UNAUTHORIZED");

        let (status, _) = call(&h.app, Method::GET, "/stats", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let h = harness().await;
        let (status, _) = call(
            &h.app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": "boss", "password": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rent_and_return_bills_and_updates_views() {
        let h = harness().await;
        let token = login(&h.app, "boss", "boss-pw").await;
        let asset_id = create_drill(&h.app, &token).await;

        let (status, body) = call(
            &h.app,
            Method::POST,
            &format!("/assets/{}/rentals", asset_id),
            Some(&token),
            Some(json!({ "customerPhone": "555-0100", "guaranteeDocument": "ID-42" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert!(body["data"]["endTimeMs"].is_null());

        // 写后读：视图已包含开租结果
        let (_, body) = call(&h.app, Method::GET, "/assets?status=rented", Some(&token), None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = call(
            &h.app,
            Method::POST,
            &format!("/assets/{}/rentals", asset_id),
            Some(&token),
            Some(json!({ "customerPhone": "555-0101", "guaranteeDocument": "ID-43" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "RESOURCE.CONFLICT");

        // 1 天 3 小时 → 70 + 30
        h.clock.advance_hours(27);
        let (status, body) = call(
            &h.app,
            Method::POST,
            &format!("/assets/{}/return", asset_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["billing"]["totalCost"], 100.0);
        assert_eq!(body["data"]["billing"]["fullDays"], 1.0);
        assert_eq!(body["data"]["rental"]["totalCost"], 100.0);
        assert_eq!(
            body["data"]["rental"]["endTimeMs"].as_i64().unwrap()
                - body["data"]["rental"]["startTimeMs"].as_i64().unwrap(),
            27 * HOUR_MS
        );

        let (_, body) = call(&h.app, Method::GET, "/stats", Some(&token), None).await;
        assert_eq!(body["data"]["totalRevenue"], 100.0);
        assert_eq!(body["data"]["activeRentals"], 0);
        assert_eq!(body["data"]["availableAssets"], 1);

        let (_, body) = call(&h.app, Method::GET, "/rentals?active=true", Some(&token), None).await;
        assert!(body["data"].as_array().unwrap().is_empty());

        let (_, body) = call(&h.app, Method::GET, "/activity", Some(&token), None).await;
        let kinds: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds[0], "RENT_CLOSED");
        assert!(kinds.contains(&"RENT_OPENED"));
        assert!(kinds.contains(&"ASSET_ADDED"));
    }

    #[tokio::test]
    async fn return_without_open_rental_is_not_found() {
        let h = harness().await;
        let token = login(&h.app, "boss", "boss-pw").await;
        let asset_id = create_drill(&h.app, &token).await;
        let (status, body) = call(
            &h.app,
            Method::POST,
            &format!("/assets/{}/return", asset_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "RESOURCE.NOT_FOUND");
    }

    #[tokio::test]
    async fn worker_can_rent_but_not_manage_assets() {
        let h = harness().await;
        let boss = login(&h.app, "boss", "boss-pw").await;
        let (status, body) = call(
            &h.app,
            Method::POST,
            "/actors",
            Some(&boss),
            Some(json!({ "username": "wendy", "password": "w-pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["role"], "worker");
        let asset_id = create_drill(&h.app, &boss).await;

        let worker = login(&h.app, "wendy", "w-pw").await;
        let (status, body) = call(
            &h.app,
            Method::PUT,
            &format!("/assets/{}/status", asset_id),
            Some(&worker),
            Some(json!({ "status": "maintenance" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "AUTH.FORBIDDEN");

        let (status, _) = call(
            &h.app,
            Method::POST,
            "/assets",
            Some(&worker),
            Some(json!({ "name": "Saw", "hourlyRate": 1.0, "dailyRate": 5.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call(
            &h.app,
            Method::POST,
            &format!("/assets/{}/rentals", asset_id),
            Some(&worker),
            Some(json!({ "customerPhone": "555", "guaranteeDocument": "ID" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["actorUsername"], "wendy");
    }

    #[tokio::test]
    async fn invalid_input_is_bad_request() {
        let h = harness().await;
        let token = login(&h.app, "boss", "boss-pw").await;
        let (status, body) = call(
            &h.app,
            Method::POST,
            "/assets",
            Some(&token),
            Some(json!({ "name": "Lift", "hourlyRate": -1.0, "dailyRate": 5.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID.REQUEST");

        let asset_id = create_drill(&h.app, &token).await;
        let (status, _) = call(
            &h.app,
            Method::PUT,
            &format!("/assets/{}/status", asset_id),
            Some(&token),
            Some(json!({ "status": "rented" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&h.app, Method::GET, "/assets?status=lost", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deleted_asset_leaves_list_and_rented_asset_cannot_be_deleted() {
        let h = harness().await;
        let token = login(&h.app, "boss", "boss-pw").await;
        let rented = create_drill(&h.app, &token).await;
        let idle = create_drill(&h.app, &token).await;
        let (status, _) = call(
            &h.app,
            Method::POST,
            &format!("/assets/{}/rentals", rented),
            Some(&token),
            Some(json!({ "customerPhone": "555", "guaranteeDocument": "ID" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(
            &h.app,
            Method::DELETE,
            &format!("/assets/{}", rented),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(
            &h.app,
            Method::DELETE,
            &format!("/assets/{}", idle),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&h.app, Method::GET, "/assets", Some(&token), None).await;
        let ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["assetId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![rented.as_str()]);
    }

    #[tokio::test]
    async fn update_changes_rates_and_name_filter_matches() {
        let h = harness().await;
        let token = login(&h.app, "boss", "boss-pw").await;
        let asset_id = create_drill(&h.app, &token).await;
        let (status, body) = call(
            &h.app,
            Method::PUT,
            &format!("/assets/{}", asset_id),
            Some(&token),
            Some(json!({ "dailyRate": 60.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["dailyRate"], 60.0);
        assert_eq!(body["data"]["hourlyRate"], 10.0);

        let (_, body) = call(&h.app, Method::GET, "/assets?q=DRILL", Some(&token), None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        let (_, body) = call(&h.app, Method::GET, "/assets?q=saw", Some(&token), None).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }
}
