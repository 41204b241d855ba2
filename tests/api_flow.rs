//! End-to-end flows through the HTTP router, backed by the in-memory store.

#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use chairtime::api;
use chairtime::app_state::AppState;
use chairtime::notify::{LogNotifier, Notifier};
use chairtime::persistence::{BookingStore, InMemoryStore};
use chairtime::service::{AvailabilityRegistry, BookingLedger};

fn app() -> Router {
    let store: Arc<dyn BookingStore> = Arc::new(InMemoryStore::new());
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let registry = Arc::new(AvailabilityRegistry::new(Arc::clone(&store)));
    let ledger = Arc::new(BookingLedger::new(store, notifier));
    api::build_router().with_state(AppState { ledger, registry })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("failed to build request for {method} {uri}");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router errored for {method} {uri}");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("failed to read body for {method} {uri}");
    };
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn booking_payload(time: &str) -> Value {
    json!({
        "date": "2025-06-10",
        "time": time,
        "service": "haircut",
        "client_name": "Dana Mori",
        "client_email": "dana@example.com"
    })
}

async fn seed_schedule(app: &Router, slots: &[&str]) {
    let (status, _) = send(
        app,
        "POST",
        "/api/v1/schedules",
        Some(json!({ "date": "2025-06-10", "slots": slots })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

fn times_of(body: &Value) -> Vec<String> {
    let Some(times) = body.get("times").and_then(Value::as_array) else {
        panic!("missing times array in {body}");
    };
    times
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(Value::as_str), Some("healthy"));
}

#[tokio::test]
async fn schedule_crud_round_trip() {
    let app = app();
    seed_schedule(&app, &["10:00", "09:00", "10:00"]).await;

    let (status, body) = send(&app, "GET", "/api/v1/schedules/2025-06-10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("slots"), Some(&json!(["09:00", "10:00"])));

    let (status, body) = send(&app, "GET", "/api/v1/schedules", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = send(&app, "DELETE", "/api/v1/schedules/2025-06-10", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/v1/schedules/2025-06-10", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body.pointer("/error/code").and_then(Value::as_u64),
        Some(2002)
    );
}

#[tokio::test]
async fn malformed_slot_label_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/schedules",
        Some(json!({ "date": "2025-06-10", "slots": ["09:00", "9pm"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/error/code").and_then(Value::as_u64),
        Some(1002)
    );
}

#[tokio::test]
async fn booking_consumes_and_cancel_restores() {
    let app = app();
    seed_schedule(&app, &["09:00", "10:00"]).await;

    // Book 09:00
    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(booking_payload("09:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(id) = created.get("id").and_then(Value::as_str).map(str::to_string) else {
        panic!("missing id in {created}");
    };

    // 09:00 is gone from availability
    let (status, body) = send(&app, "GET", "/api/v1/availability/2025-06-10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(times_of(&body), vec!["10:00"]);

    // The same booking again conflicts and nothing is added
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(booking_payload("09:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body.pointer("/error/code").and_then(Value::as_u64),
        Some(2003)
    );
    let (_, body) = send(&app, "GET", "/api/v1/appointments", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // Cancel restores the slot
    let (status, cancelled) =
        send(&app, "DELETE", &format!("/api/v1/appointments/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled.get("time").and_then(Value::as_str), Some("09:00"));

    let (_, body) = send(&app, "GET", "/api/v1/availability/2025-06-10", None).await;
    assert_eq!(times_of(&body), vec!["09:00", "10:00"]);

    // Cancelling again is a 404
    let (status, _) = send(&app, "DELETE", &format!("/api/v1/appointments/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_contact_is_rejected_without_side_effects() {
    let app = app();
    seed_schedule(&app, &["09:00"]).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(json!({
            "date": "2025-06-10",
            "time": "09:00",
            "service": "haircut",
            "client_name": "Dana Mori"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/error/code").and_then(Value::as_u64),
        Some(1001)
    );

    let (_, body) = send(&app, "GET", "/api/v1/appointments", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));
    let (_, body) = send(&app, "GET", "/api/v1/availability/2025-06-10", None).await;
    assert_eq!(times_of(&body), vec!["09:00"]);
}

#[tokio::test]
async fn unconfigured_date_availability_is_empty() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/v1/availability/2030-01-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(times_of(&body).is_empty());
}

#[tokio::test]
async fn booking_without_schedule_is_allowed() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(booking_payload("09:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn update_moves_the_appointment() {
    let app = app();
    seed_schedule(&app, &["09:00", "10:00", "11:00"]).await;

    let (_, first) = send(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(booking_payload("09:00")),
    )
    .await;
    let Some(first_id) = first.get("id").and_then(Value::as_str).map(str::to_string) else {
        panic!("missing id in {first}");
    };
    let (_, _second) = send(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(booking_payload("10:00")),
    )
    .await;

    // Moving onto an occupied slot conflicts
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/appointments/{first_id}"),
        Some(json!({ "time": "10:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Moving to a free slot succeeds and availability follows
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/v1/appointments/{first_id}"),
        Some(json!({ "time": "11:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated.get("time").and_then(Value::as_str), Some("11:00"));

    let (_, body) = send(&app, "GET", "/api/v1/availability/2025-06-10", None).await;
    assert_eq!(times_of(&body), vec!["09:00"]);
}

#[tokio::test]
async fn update_unknown_appointment_is_not_found() {
    let app = app();
    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/appointments/00000000-0000-4000-8000-000000000000",
        Some(json!({ "time": "09:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body.pointer("/error/code").and_then(Value::as_u64),
        Some(2001)
    );
}

#[tokio::test]
async fn appointments_list_is_ordered() {
    let app = app();
    seed_schedule(&app, &["09:00", "10:00", "11:00"]).await;

    for time in ["11:00", "09:00", "10:00"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/appointments",
            Some(booking_payload(time)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/api/v1/appointments", None).await;
    let Some(list) = body.as_array() else {
        panic!("expected array, got {body}");
    };
    let times: Vec<&str> = list
        .iter()
        .filter_map(|entry| entry.get("time").and_then(Value::as_str))
        .collect();
    assert_eq!(times, vec!["09:00", "10:00", "11:00"]);
}
