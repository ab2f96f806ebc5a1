//! Route definitions for the library dashboard API.

pub mod dashboard;
pub mod health;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url = %state.config.frontend_url, "Invalid FRONTEND_URL, CORS disabled");
            CorsLayer::new()
        }
    };

    let dashboard_routes = Router::new()
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/snapshot", get(dashboard::snapshot))
        .route("/dashboard/refresh", post(dashboard::refresh));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", dashboard_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::Locale;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::{AppConfig, Staleness};
    use crate::errors::FetchError;
    use crate::models::user::UserRole;
    use crate::models::Resource;
    use crate::services::auth::generate_access_token;
    use crate::services::dashboard::DashboardService;
    use crate::services::library_api::ResourceSource;

    const SECRET: &str = "router-test-secret";

    #[derive(Debug)]
    struct TwoUsers;

    #[async_trait]
    impl ResourceSource for TwoUsers {
        async fn fetch(&self, resource: Resource) -> Result<Value, FetchError> {
            match resource {
                Resource::Users => Ok(json!([{"id": 1, "role": "admin"}, {"id": 2, "role": "member"}])),
                _ => Ok(json!([])),
            }
        }
    }

    fn app() -> Router {
        let config = AppConfig {
            library_api_url: "http://library.invalid/api".to_string(),
            library_api_token: None,
            library_api_timeout_secs: 1,
            reference_stale_secs: 300,
            request_stale_secs: 120,
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: SECRET.to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            locale: Locale::en_US,
        };
        let dashboard = DashboardService::new(Arc::new(TwoUsers), Staleness::default(), Locale::en_US);
        router(AppState {
            config,
            dashboard: Arc::new(dashboard),
        })
    }

    fn bearer(role: UserRole) -> String {
        let token = generate_access_token("tester", "1", &role, SECRET, 900).unwrap();
        format!("Bearer {token}")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn live_is_ok() {
        let request = Request::get("/health/live").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn stats_requires_token() {
        let request = Request::get("/api/v1/dashboard/stats").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn stats_rejects_non_admin() {
        let request = Request::get("/api/v1/dashboard/stats")
            .header(header::AUTHORIZATION, bearer(UserRole::Librarian))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn stats_returns_view_for_admin() {
        let request = Request::get("/api/v1/dashboard/stats")
            .header(header::AUTHORIZATION, bearer(UserRole::Admin))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["stats"]["users"]["total"], 2);
        assert_eq!(body["data"]["stats"]["users"]["admins"], 1);
        assert_eq!(body["data"]["is_loading"], false);
        assert_eq!(body["data"]["resources"][0]["resource"], "users");
        assert_eq!(body["data"]["resources"][0]["state"], "ready");
    }

    #[tokio::test]
    async fn snapshot_is_loading_before_first_fetch() {
        let request = Request::get("/api/v1/dashboard/snapshot")
            .header(header::AUTHORIZATION, bearer(UserRole::Admin))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_loading"], true);
    }

    #[tokio::test]
    async fn ready_reports_pending_resources() {
        let request = Request::get("/health/ready").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["resources"][2]["resource"], "categories");
        assert_eq!(body["data"]["resources"][2]["state"], "pending");
    }
}
