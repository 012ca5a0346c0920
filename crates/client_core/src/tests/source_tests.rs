use super::*;
use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::domain::{DeviceEvent, EventId, SensorReading};
use tokio::{net::TcpListener, sync::Mutex};

type Captured = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn spawn_server(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn led_events_page(
    State(captured): State<Captured>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    captured.lock().await.push(params.clone());
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    Json(json!({
        "content": [
            {"id": 31, "ledNumber": 1, "state": "ON", "stateOn": true, "createdAt": "2024-05-01T09:00:00"},
            {"id": 30, "ledNumber": 3, "state": "OFF", "stateOn": false, "createdAt": "2024-05-01T08:59:00"}
        ],
        "currentPage": page,
        "totalPages": 4,
        "totalElements": 32,
        "size": 2,
        "first": page == 0,
        "last": page == 3,
        "deviceFilter": params.get("deviceFilter"),
    }))
}

fn client() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).expect("client")
}

fn sensor_source(http: reqwest::Client, server_url: &str) -> HttpListSource<SensorReading> {
    HttpListSource::new(http, server_url, &ListResource::sensor_readings())
}

#[tokio::test]
async fn fetches_page_with_query_parameters() {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/api/led-events/paginated", get(led_events_page))
        .with_state(captured.clone());
    let server_url = spawn_server(app).await;
    let source = HttpListSource::<DeviceEvent>::new(
        client(),
        &format!("{server_url}/"),
        &ListResource::device_events(),
    );
    assert_eq!(
        source.endpoint(),
        format!("{server_url}/api/led-events/paginated")
    );

    let query = ListResource::device_events()
        .default_query()
        .with_page(2)
        .with_page_size(2)
        .with_filter("search", "on");
    let page = source.fetch_page(&query).await.expect("page");

    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_items, 32);
    assert_eq!(page.items[0].id, EventId(31));
    assert_eq!(page.items[1].is_on(), Some(false));

    let params = captured.lock().await.pop().expect("request");
    assert_eq!(params.get("page").map(String::as_str), Some("2"));
    assert_eq!(params.get("size").map(String::as_str), Some("2"));
    assert_eq!(params.get("deviceFilter").map(String::as_str), Some("all"));
    assert_eq!(params.get("search").map(String::as_str), Some("on"));
    assert!(!params.contains_key("timeFilter"));
}

#[tokio::test]
async fn server_error_becomes_fetch_error_with_detail() {
    let app = Router::new().route(
        "/api/sensor-data/paginated",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch data: db down"})),
            )
        }),
    );
    let server_url = spawn_server(app).await;
    let source = sensor_source(client(), &server_url);

    let err = source
        .fetch_page(&ListQuery::new(10))
        .await
        .expect_err("must fail");
    assert_eq!(
        err,
        ListError::Fetch {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            detail: Some("Failed to fetch data: db down".to_string()),
        }
    );
}

#[tokio::test]
async fn not_found_without_body_has_no_detail() {
    let server_url = spawn_server(Router::new()).await;
    let source = sensor_source(client(), &server_url);

    let err = source
        .fetch_page(&ListQuery::new(10))
        .await
        .expect_err("must fail");
    assert_eq!(err.status(), Some(404));
    assert!(matches!(err, ListError::Fetch { detail: None, .. }));
}

#[tokio::test]
async fn malformed_body_becomes_parse_error() {
    let app = Router::new().route(
        "/api/sensor-data/paginated",
        get(|| async { Json(json!({"content": [], "currentPage": 0})) }),
    );
    let server_url = spawn_server(app).await;
    let source = sensor_source(client(), &server_url);

    let err = source
        .fetch_page(&ListQuery::new(10))
        .await
        .expect_err("must fail");
    assert!(matches!(err, ListError::Parse(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn slow_server_hits_request_timeout() {
    let app = Router::new().route(
        "/api/sensor-data/paginated",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            StatusCode::OK
        }),
    );
    let server_url = spawn_server(app).await;
    let http = build_http_client(Duration::from_millis(100)).expect("client");
    let source = sensor_source(http, &server_url);

    let err = source
        .fetch_page(&ListQuery::new(10))
        .await
        .expect_err("must fail");
    assert!(
        matches!(err, ListError::Network { timed_out: true, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let source = HttpListSource::<SensorReading>::new(
        client(),
        &format!("http://{addr}"),
        &ListResource::sensor_readings(),
    );
    let err = source
        .fetch_page(&ListQuery::new(10))
        .await
        .expect_err("must fail");
    assert!(
        matches!(err, ListError::Network { timed_out: false, .. }),
        "unexpected error: {err:?}"
    );
}
