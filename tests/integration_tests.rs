//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → HTTP page requests →
//! aggregated collection → filtered, paginated screen

use donor_dashboard::config::DashboardConfig;
use donor_dashboard::fetch::{EndpointConfig, PagedCollectionFetcher};
use donor_dashboard::http::HttpClient;
use donor_dashboard::screen::{FilterChange, ListScreen, RefreshStatus};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

/// Config pointed at the mock server, without retries or rate limiting
fn config_for(server: &MockServer, extra: &str) -> DashboardConfig {
    let yaml = format!(
        r"
base_url: {}
http:
  max_retries: 0
  requests_per_second: 0
{}
",
        server.uri(),
        extra
    );
    let config = assert_ok!(DashboardConfig::from_yaml_str(&yaml));
    assert_ok!(config.validate());
    config
}

fn fetcher(config: &DashboardConfig) -> PagedCollectionFetcher<HttpClient> {
    let client =
        HttpClient::with_auth(config.http_client_config(), config.auth_config()).unwrap();
    PagedCollectionFetcher::new(client)
}

fn donors(ids: std::ops::RangeInclusive<i64>) -> Vec<Value> {
    ids.map(|id| {
        json!({
            "id": id,
            "donorNameFirst": format!("Donor{id}"),
            "donorNameLast": "Smith",
            "status": if id % 2 == 0 { "CONFIRMED" } else { "PENDING" },
        })
    })
    .collect()
}

async fn mount_page(server: &MockServer, route: &str, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Aggregation
// ============================================================================

#[tokio::test]
async fn test_donor_screen_aggregates_every_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/donors/donor-registrations",
        1,
        json!({ "data": donors(1..=10), "meta": { "current_page": 1, "last_page": 2 } }),
    )
    .await;
    mount_page(
        &server,
        "/donors/donor-registrations",
        2,
        json!({ "data": donors(11..=13), "meta": { "current_page": 2, "last_page": 2 } }),
    )
    .await;

    let config = config_for(&server, "");
    let fetcher = fetcher(&config);
    let mut screen = ListScreen::from_config(&config, "donors").unwrap();

    let status = screen.refresh(&fetcher).await;
    assert_eq!(
        status,
        RefreshStatus::Loaded {
            records: 13,
            truncated: false
        }
    );

    let view = screen.view();
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.items.len(), 10);

    assert_eq!(screen.set_page(2), 2);
    let snapshot = screen.snapshot();
    assert_eq!(snapshot.page.items.len(), 3);
    assert_eq!(snapshot.summary, "Showing 11 to 13 of 13 donors");
    assert!(!snapshot.page.has_next);
    assert!(snapshot.page.has_previous);
}

#[tokio::test]
async fn test_failed_page_keeps_partial_results() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/donors/donor-registrations",
        1,
        json!({ "data": donors(1..=10), "meta": { "last_page": 3 } }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/donors/donor-registrations"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "Server down" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, "");
    let mut screen = ListScreen::from_config(&config, "donors").unwrap();

    let status = screen.refresh(&fetcher(&config)).await;
    assert_eq!(
        status,
        RefreshStatus::Partial {
            records: 10,
            message: "Server down".to_string()
        }
    );
    assert_eq!(screen.last_error(), Some("Server down"));
    assert_eq!(screen.filtered().len(), 10);

    // Filters still work on what arrived
    assert_eq!(
        screen.set_filter("status", "CONFIRMED"),
        FilterChange::Recomputed
    );
    assert_eq!(screen.filtered().len(), 5);
}

#[tokio::test]
async fn test_duplicate_ids_across_pages_are_dropped() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/payments",
        1,
        json!({ "data": [{ "id": 1, "status": "PENDING" }, { "id": 2, "status": "FAILED" }], "totalPages": 2 }),
    )
    .await;
    mount_page(
        &server,
        "/payments",
        2,
        json!({ "data": [{ "id": 2, "status": "COMPLETED" }, { "id": 3, "status": "COMPLETED" }], "totalPages": 2 }),
    )
    .await;

    let config = config_for(&server, "");
    let mut screen = ListScreen::from_config(&config, "payments").unwrap();
    screen.refresh(&fetcher(&config)).await;

    let snapshot = screen.snapshot();
    assert_eq!(snapshot.total_records, 3);
    assert_eq!(snapshot.duplicates_rejected, 1);
    assert_eq!(snapshot.page.items[1]["status"], "FAILED");
}

#[tokio::test]
async fn test_fetch_all_with_http_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "svc-1", "title": "Urine panel" },
            { "id": "svc-2", "title": "Hair panel" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, "");
    let outcome = fetcher(&config)
        .fetch_all(&EndpointConfig::new("/services"))
        .await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.pages_fetched, 1);
    let collection = assert_ok!(outcome.into_result());
    assert_eq!(collection.len(), 2);
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_bearer_token_sent_on_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/payments"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "transactionId": "tx-1" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, "token: admin-token");
    let mut screen = ListScreen::from_config(&config, "payments").unwrap();

    let status = screen.refresh(&fetcher(&config)).await;
    assert_eq!(
        status,
        RefreshStatus::Loaded {
            records: 1,
            truncated: false
        }
    );
}

#[tokio::test]
async fn test_session_login_then_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "admin@example.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "token": "session-token",
            "role": "ADMIN",
            "username": "admin"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .and(header("Authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "title": "Panel", "status": true }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        r"
auth:
  type: session
  email: admin@example.com
  password: secret
",
    );
    let fetcher = fetcher(&config);
    let mut screen = ListScreen::from_config(&config, "services").unwrap();

    // The token is reused across refreshes
    screen.refresh(&fetcher).await;
    let status = screen.refresh(&fetcher).await;
    assert!(!status.is_stale());
    assert_eq!(screen.collection().len(), 1);
}

#[tokio::test]
async fn test_rejected_login_surfaces_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let config = config_for(
        &server,
        r"
auth:
  type: session
  email: admin@example.com
  password: wrong
",
    );
    let mut screen = ListScreen::from_config(&config, "services").unwrap();

    match screen.refresh(&fetcher(&config)).await {
        RefreshStatus::Partial { records, message } => {
            assert_eq!(records, 0);
            assert!(message.contains("Invalid credentials"), "{message}");
        }
        other => panic!("expected a failed refresh, got {other:?}"),
    }
}

// ============================================================================
// Server-side parameters
// ============================================================================

#[tokio::test]
async fn test_users_envelope_with_page_size_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                { "id": 1, "email": "a@example.com", "role": "ADMIN" },
                { "id": 2, "email": "b@example.com", "role": "USER" }
            ],
            "totalPages": 2,
            "currentPage": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": 3, "email": "c@example.com", "role": "USER" }],
            "totalPages": 2,
            "currentPage": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, "");
    let mut screen = ListScreen::from_config(&config, "users").unwrap();
    screen.refresh(&fetcher(&config)).await;

    assert_eq!(screen.collection().len(), 3);
    assert_eq!(screen.set_search("b@example"), FilterChange::Recomputed);
    assert_eq!(screen.filtered().len(), 1);
}

#[tokio::test]
async fn test_server_filter_refetches_with_query_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("role", "ADMIN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": 1, "email": "a@example.com", "role": "ADMIN" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                { "id": 1, "email": "a@example.com", "role": "ADMIN" },
                { "id": 2, "email": "b@example.com", "role": "USER" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, "");
    let fetcher = fetcher(&config);
    let mut screen = ListScreen::from_config(&config, "users").unwrap();

    screen.refresh(&fetcher).await;
    assert_eq!(screen.filtered().len(), 2);

    let change = screen.set_filter("role", "ADMIN");
    assert_eq!(change, FilterChange::RefetchRequired);
    screen.refresh(&fetcher).await;

    assert_eq!(screen.filtered().len(), 1);
    assert_eq!(screen.filtered()[0]["role"], "ADMIN");
}
