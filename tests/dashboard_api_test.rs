//! End-to-end tests: the dashboard server against a stubbed library API.
//!
//! The library API is served by `wiremock`; the dashboard router is bound to
//! a random local port and exercised over HTTP with `reqwest`.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Locale;
use library_dashboard::config::AppConfig;
use library_dashboard::models::user::UserRole;
use library_dashboard::services::auth::generate_access_token;
use library_dashboard::services::dashboard::DashboardService;
use library_dashboard::services::library_api::LibraryApiClient;
use library_dashboard::AppState;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JWT_SECRET: &str = "test-jwt-secret-for-integration-tests-only";

/// Spin up the dashboard against `library`, returning its base URL and a
/// handle to stop the server.
async fn start_server(library: &MockServer) -> (String, tokio::task::JoinHandle<()>) {
    let config = AppConfig {
        library_api_url: format!("{}/api", library.uri()),
        library_api_token: Some("service-token".to_string()),
        library_api_timeout_secs: 5,
        reference_stale_secs: 300,
        request_stale_secs: 120,
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: JWT_SECRET.to_string(),
        frontend_url: "http://localhost:5173".to_string(),
        locale: Locale::en_US,
    };

    let api = LibraryApiClient::from_config(&config).expect("client");
    let dashboard = DashboardService::new(Arc::new(api), config.staleness(), config.locale);
    let state = AppState {
        config,
        dashboard: Arc::new(dashboard),
    };
    let app = library_dashboard::routes::router(state);

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    (format!("http://{addr}"), handle)
}

fn admin_token() -> String {
    generate_access_token("admin_test", "1", &UserRole::Admin, JWT_SECRET, 900).expect("token")
}

async fn mount(library: &MockServer, resource: &str, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{resource}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(library)
        .await;
}

async fn mount_library(library: &MockServer, expected_calls: u64) {
    mount(
        library,
        "users",
        json!([
            {"id": 1, "role": "member"},
            {"id": 2, "role": "member"},
            {"id": 3, "role": "librarian"},
            {"id": 4, "role": "admin"},
            {"id": 5, "role": "guest"}
        ]),
        expected_calls,
    )
    .await;
    mount(
        library,
        "books",
        json!([
            {"id": 1, "title": "Dune", "author": "Herbert", "total_copies": 4, "times_borrowed": 20},
            {"id": 2, "title": "Emma", "author": "Austen", "total_copies": 2, "times_borrowed": 3},
            {"id": 3, "title": "Ulysses", "author": "Joyce"}
        ]),
        expected_calls,
    )
    .await;
    mount(library, "categories", json!([{"id": 1}, {"id": 2}]), expected_calls).await;
    mount(
        library,
        "borrow-requests",
        json!([
            {"id": 10, "member_name": "Ana", "book_title": "Dune", "status": "approved",
             "due_date": "2000-01-01", "created_at": "2024-01-01T10:00:00Z"},
            {"id": 11, "member_name": "Ben", "book_title": "Emma", "status": "pending",
             "created_at": "2024-02-01T10:00:00Z"},
            {"id": 12, "member_name": "Cy", "book_title": "Ulysses", "status": "returned",
             "created_at": "2023-12-01T10:00:00Z"}
        ]),
        expected_calls,
    )
    .await;
    mount(
        library,
        "donation-requests",
        json!({"count": 1, "results": [
            {"id": 20, "member_name": "Dee", "donation_title": "Atlas", "status": "completed",
             "created_at": "2024-03-01T10:00:00Z"}
        ]}),
        expected_calls,
    )
    .await;
}

#[tokio::test]
async fn stats_aggregate_library_collections() {
    let library = MockServer::start().await;
    mount_library(&library, 1).await;
    let (base, server) = start_server(&library).await;

    let resp = Client::new()
        .get(format!("{base}/api/v1/dashboard/stats"))
        .bearer_auth(admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let data = &body["data"];

    assert_eq!(data["is_loading"], false);
    assert_eq!(data["stats"]["users"]["total"], 5);
    assert_eq!(data["stats"]["users"]["active"], 2);
    assert_eq!(data["stats"]["users"]["librarians"], 1);
    assert_eq!(data["stats"]["users"]["admins"], 1);
    assert_eq!(data["stats"]["books"]["total"], 3);
    assert_eq!(data["stats"]["books"]["total_copies"], 6);
    assert_eq!(data["stats"]["books"]["categories"], 2);
    assert_eq!(data["stats"]["books"]["popular"][0]["title"], "Dune");
    assert_eq!(data["stats"]["borrows"]["approved"], 1);
    assert_eq!(data["stats"]["borrows"]["overdue"], 1);
    assert_eq!(data["stats"]["donations"]["completed"], 1);
    assert_eq!(data["recent_borrows"][0]["member_name"], "Ben");
    assert_eq!(data["recent_borrows"][0]["status"]["tone"], "warning");
    assert_eq!(data["recent_donations"][0]["donation_title"], "Atlas");

    server.abort();
}

#[tokio::test]
async fn repeated_loads_within_window_hit_the_cache() {
    let library = MockServer::start().await;
    // Each upstream endpoint may be called exactly once.
    mount_library(&library, 1).await;
    let (base, server) = start_server(&library).await;
    let client = Client::new();

    for _ in 0..3 {
        let resp = client
            .get(format!("{base}/api/v1/dashboard/stats"))
            .bearer_auth(admin_token())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    server.abort();
    library.verify().await;
}

#[tokio::test]
async fn concurrent_dashboard_loads_share_upstream_fetches() {
    let library = MockServer::start().await;
    mount_library(&library, 1).await;
    let (base, server) = start_server(&library).await;
    let client = Client::new();

    let requests = (0..10).map(|_| {
        client
            .get(format!("{base}/api/v1/dashboard/stats"))
            .bearer_auth(admin_token())
            .send()
    });
    let responses = futures::future::join_all(requests).await;
    assert!(responses
        .into_iter()
        .all(|r| r.map(|r| r.status() == StatusCode::OK).unwrap_or(false)));

    server.abort();
    library.verify().await;
}

#[tokio::test]
async fn refresh_refetches_every_resource() {
    let library = MockServer::start().await;
    mount_library(&library, 2).await;
    let (base, server) = start_server(&library).await;
    let client = Client::new();

    let first = client
        .get(format!("{base}/api/v1/dashboard/stats"))
        .bearer_auth(admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let refreshed = client
        .post(format!("{base}/api/v1/dashboard/refresh"))
        .bearer_auth(admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(refreshed.status(), StatusCode::OK);

    server.abort();
    library.verify().await;
}

#[tokio::test]
async fn failing_resource_degrades_to_empty() {
    let library = MockServer::start().await;
    mount(&library, "users", json!([{"id": 1, "role": "admin"}]), 1).await;
    mount(&library, "categories", json!([]), 1).await;
    mount(&library, "borrow-requests", json!(null), 1).await;
    mount(&library, "donation-requests", json!([]), 1).await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&library)
        .await;
    let (base, server) = start_server(&library).await;

    let resp = Client::new()
        .get(format!("{base}/api/v1/dashboard/stats"))
        .bearer_auth(admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let data = &body["data"];

    assert_eq!(data["stats"]["books"]["total"], 0);
    assert_eq!(data["stats"]["books"]["popular"], json!([]));
    assert_eq!(data["stats"]["borrows"]["total"], 0);
    assert_eq!(data["stats"]["users"]["admins"], 1);
    assert_eq!(data["resources"][1]["resource"], "books");
    assert_eq!(data["resources"][1]["state"], "unavailable");
    assert_eq!(data["resources"][1]["error"], "books responded with HTTP 500");

    let ready: Value = Client::new()
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ready["data"]["status"], "degraded");

    server.abort();
}

#[tokio::test]
async fn dashboard_requires_admin_token() {
    let library = MockServer::start().await;
    let (base, server) = start_server(&library).await;
    let client = Client::new();

    let anonymous = client
        .get(format!("{base}/api/v1/dashboard/stats"))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let member_token =
        generate_access_token("member", "2", &UserRole::Member, JWT_SECRET, 900).unwrap();
    let member = client
        .get(format!("{base}/api/v1/dashboard/stats"))
        .bearer_auth(member_token)
        .send()
        .await
        .unwrap();
    assert_eq!(member.status(), StatusCode::FORBIDDEN);

    // Nothing reached the library API.
    assert!(library.received_requests().await.unwrap().is_empty());

    server.abort();
}
