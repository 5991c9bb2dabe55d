mod common;

use axum::http::Method;
use common::{memory_router, request, send};
use serde_json::json;
use tower::util::ServiceExt;

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn add_returns_created_with_assigned_id() {
    let app = memory_router();

    let (status, body) = send(
        &app,
        Method::POST,
        "/appointmentapi/add",
        Some(json!({ "date": "2024-01-01", "reason": "checkup" })),
    )
    .await;

    assert_eq!(status, 201);
    assert_eq!(body["id"], 1);
    assert_eq!(body["date"], "2024-01-01");
    assert_eq!(body["reason"], "checkup");
}

#[tokio::test]
async fn add_ignores_client_supplied_id() {
    let app = memory_router();

    let (status, body) = send(
        &app,
        Method::POST,
        "/appointmentapi/add",
        Some(json!({ "id": 500, "patientName": "Asha" })),
    )
    .await;

    assert_eq!(status, 201);
    assert_eq!(body["id"], 1);

    let (status, _) = send(&app, Method::GET, "/appointmentapi/get/500", None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn add_then_get_round_trips_every_field() {
    let app = memory_router();
    let appointment = json!({
        "patientName": "Asha",
        "doctorName": "Dr. Rao",
        "department": "Cardiology",
        "date": "2024-03-14",
        "time": "10:30",
        "reason": "follow-up",
        "status": "scheduled",
        "contact": "9999999999",
        "email": "asha@example.com"
    });

    let (_, created) = send(&app, Method::POST, "/appointmentapi/add", Some(appointment.clone())).await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, Method::GET, &format!("/appointmentapi/get/{}", id), None).await;

    assert_eq!(status, 200);
    let mut expected = appointment;
    expected["id"] = json!(id);
    assert_eq!(fetched, expected);
}

// =============================================================================
// Read
// =============================================================================

#[tokio::test]
async fn all_is_empty_initially() {
    let app = memory_router();

    let (status, body) = send(&app, Method::GET, "/appointmentapi/all", None).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn all_contains_added_records_in_order() {
    let app = memory_router();
    let (_, first) = send(&app, Method::POST, "/appointmentapi/add", Some(json!({ "reason": "a" }))).await;
    let (_, second) = send(&app, Method::POST, "/appointmentapi/add", Some(json!({ "reason": "b" }))).await;

    let (status, body) = send(&app, Method::GET, "/appointmentapi/all", None).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!([first, second]));
}

#[tokio::test]
async fn get_unknown_id_returns_not_found() {
    let app = memory_router();

    let (status, _) = send(&app, Method::GET, "/appointmentapi/get/12345", None).await;

    assert_eq!(status, 404);
}

#[tokio::test]
async fn get_with_non_numeric_id_is_rejected() {
    let app = memory_router();

    let (status, _) = send(&app, Method::GET, "/appointmentapi/get/abc", None).await;

    assert_eq!(status, 400);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_replaces_all_fields() {
    let app = memory_router();
    let (_, created) = send(
        &app,
        Method::POST,
        "/appointmentapi/add",
        Some(json!({ "patientName": "Asha", "reason": "checkup" })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let replacement = json!({
        "id": id,
        "patientName": "Asha",
        "doctorName": "Dr. Rao",
        "department": null,
        "date": "2024-02-02",
        "time": null,
        "reason": null,
        "status": "confirmed",
        "contact": null,
        "email": null
    });
    let (status, updated) = send(&app, Method::PUT, "/appointmentapi/update", Some(replacement.clone())).await;

    assert_eq!(status, 200);
    assert_eq!(updated, replacement);

    let (_, fetched) = send(&app, Method::GET, &format!("/appointmentapi/get/{}", id), None).await;
    assert_eq!(fetched, replacement);
}

#[tokio::test]
async fn update_of_unknown_id_is_a_server_error() {
    let app = memory_router();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/appointmentapi/update",
        Some(json!({ "id": 999, "reason": "ghost" })),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "Database error");

    let (_, all) = send(&app, Method::GET, "/appointmentapi/all", None).await;
    assert_eq!(all, json!([]));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_then_get_returns_not_found() {
    let app = memory_router();
    let (_, created) = send(&app, Method::POST, "/appointmentapi/add", Some(json!({ "reason": "checkup" }))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/appointmentapi/delete/{}", id), None).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Appointment deleted successfully.");

    let (status, _) = send(&app, Method::GET, &format!("/appointmentapi/get/{}", id), None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn delete_of_unknown_id_still_succeeds() {
    let app = memory_router();

    let (status, body) = send(&app, Method::DELETE, "/appointmentapi/delete/77", None).await;

    assert_eq!(status, 200);
    assert_eq!(body, "Appointment deleted successfully.");
}

// =============================================================================
// End-to-end scenario
// =============================================================================

#[tokio::test]
async fn add_get_delete_get_scenario() {
    let app = memory_router();

    let (status, created) = send(
        &app,
        Method::POST,
        "/appointmentapi/add",
        Some(json!({ "date": "2024-01-01", "desc": "checkup" })),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["id"], 1);

    let (status, fetched) = send(&app, Method::GET, "/appointmentapi/get/1", None).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, Method::DELETE, "/appointmentapi/delete/1", None).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Appointment deleted successfully.");

    let (status, _) = send(&app, Method::GET, "/appointmentapi/get/1", None).await;
    assert_eq!(status, 404);
}

// =============================================================================
// Cross-cutting
// =============================================================================

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = memory_router();

    let response = app
        .oneshot({
            let mut req = request(Method::GET, "/appointmentapi/all", None);
            req.headers_mut()
                .insert("origin", "http://localhost:5173".parse().unwrap());
            req
        })
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = memory_router();

    let response = app
        .oneshot(request(Method::GET, "/appointmentapi/all", None))
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
