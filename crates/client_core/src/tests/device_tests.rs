use super::*;
use std::{collections::HashMap, time::Duration};

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use crate::source::build_http_client;

async fn control(
    Path(led_number): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let state = params.get("state").map(String::as_str) == Some("true");
    Json(json!({
        "success": true,
        "message": format!("LED{led_number} {} command sent", if state { "ON" } else { "OFF" }),
        "led_number": led_number,
        "state": state,
        "timestamp": "2024-05-01T09:00:00"
    }))
}

async fn spawn_control_server() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route("/api/leds/:led_number/control", post(control));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn switches_device_on() {
    let server_url = spawn_control_server().await;
    let client = DeviceControlClient::new(
        build_http_client(Duration::from_secs(5)).expect("client"),
        server_url,
    );

    let reply = client.set_state(Device::Fan, true).await.expect("control");
    assert!(reply.success);
    assert!(reply.state);
    assert_eq!(reply.led_number, 2);
    assert_eq!(reply.message.as_deref(), Some("LED2 ON command sent"));
}

#[tokio::test]
async fn switches_device_off() {
    let server_url = spawn_control_server().await;
    let client = DeviceControlClient::new(
        build_http_client(Duration::from_secs(5)).expect("client"),
        format!("{server_url}/"),
    );

    let reply = client
        .set_state(Device::AirConditioner, false)
        .await
        .expect("control");
    assert!(!reply.state);
    assert_eq!(reply.led_number, 3);
}

#[tokio::test]
async fn rejected_command_surfaces_backend_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/api/leds/:led_number/control",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "error": "MQTT broker offline"})),
            )
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = DeviceControlClient::new(
        build_http_client(Duration::from_secs(5)).expect("client"),
        format!("http://{addr}"),
    );
    let err = client
        .set_state(Device::Light, true)
        .await
        .expect_err("must fail");
    assert_eq!(err.status(), Some(400));
    assert!(err.user_message().contains("MQTT broker offline"));
}

async fn led_state(Path(led_number): Path<i32>) -> impl IntoResponse {
    match led_number {
        1 => Json(json!(true)).into_response(),
        2 => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "device service offline"})),
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_status_server(recent: serde_json::Value) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/api/leds/:led_number/state", get(led_state))
        .route(
            "/api/sensor-data/recent",
            get(move || async move { Json(recent) }),
        );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn status_client(server_url: String) -> DeviceControlClient {
    DeviceControlClient::new(
        build_http_client(Duration::from_secs(5)).expect("client"),
        server_url,
    )
}

#[tokio::test]
async fn reads_device_state() {
    let client = status_client(spawn_status_server(json!([])).await);

    assert_eq!(client.state(Device::Light).await.expect("state"), Some(true));
    assert_eq!(
        client.state(Device::AirConditioner).await.expect("state"),
        None
    );

    let err = client.state(Device::Fan).await.expect_err("unavailable");
    assert_eq!(err.status(), Some(503));
    assert!(err.user_message().contains("device service offline"));
}

#[tokio::test]
async fn latest_reading_is_first_recent_row() {
    let recent = json!([
        {"id": 42, "temperature": 24.0, "humidity": 55.5, "lightLevel": 70, "createdAt": "2024-05-01T10:00:05"},
        {"id": 41, "temperature": 23.9, "humidity": 55.0, "lightLevel": 69, "createdAt": "2024-05-01T10:00:00"}
    ]);
    let client = status_client(spawn_status_server(recent).await);

    let reading = client
        .latest_reading()
        .await
        .expect("recent")
        .expect("a reading");
    assert_eq!(reading.id.0, 42);
    assert_eq!(reading.humidity, Some(55.5));
}

#[tokio::test]
async fn latest_reading_is_none_without_data() {
    let client = status_client(spawn_status_server(json!([])).await);
    assert!(client.latest_reading().await.expect("recent").is_none());
}
