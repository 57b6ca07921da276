mod common;

use axum::http::StatusCode;
use common::{post_json, router_with};
use serde_json::json;
use site_service::services::MemoryStore;
use std::sync::Arc;

#[tokio::test]
async fn partner_lead_with_valid_email_is_created() {
    let store = Arc::new(MemoryStore::new());
    let app = router_with(store.clone(), true);

    let (status, body) = post_json(
        &app,
        "/api/partners/leads",
        json!({ "venue_name": "Kallio Jazz Bar", "contact_email": "a@b.com", "city": "Helsinki" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], true);

    let stored = store.documents("partnerlead");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].get_str("source").unwrap(), "website");
    assert_eq!(stored[0].get_str("city").unwrap(), "Helsinki");
    assert_eq!(
        stored[0].get_object_id("_id").unwrap().to_hex(),
        body["id"].as_str().unwrap()
    );
}

#[tokio::test]
async fn partner_lead_with_bad_email_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = router_with(store.clone(), true);

    let (status, body) = post_json(
        &app,
        "/api/partners/leads",
        json!({ "venue_name": "Kallio Jazz Bar", "contact_email": "not-an-email" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["contact_email"][0], "Invalid email address");
    assert_eq!(store.count("partnerlead"), 0);
}

#[tokio::test]
async fn contact_message_is_created() {
    let store = Arc::new(MemoryStore::new());
    let app = router_with(store.clone(), true);

    let (status, body) = post_json(
        &app,
        "/api/contact/messages",
        json!({
            "name": "Aino",
            "email": "aino@example.fi",
            "message": "Can we book the back room?",
            "topic": "booking"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], true);
    assert_eq!(store.count("contactmessage"), 1);
}

#[tokio::test]
async fn contact_message_reports_every_invalid_field() {
    let store = Arc::new(MemoryStore::new());
    let app = router_with(store.clone(), true);

    let (status, body) = post_json(
        &app,
        "/api/contact/messages",
        json!({ "name": "", "email": "nope", "message": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("email"));
    assert!(fields.contains_key("message"));
    assert_eq!(store.count("contactmessage"), 0);
}

#[tokio::test]
async fn partner_lead_shape_errors_are_reported_together() {
    let store = Arc::new(MemoryStore::new());
    let app = router_with(store.clone(), true);

    let (status, body) = post_json(
        &app,
        "/api/partners/leads",
        json!({ "contact_email": 12, "city": ["Helsinki"] }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["venue_name"][0], "Field required");
    assert_eq!(body["fields"]["contact_email"][0], "Expected a string");
    assert_eq!(body["fields"]["city"][0], "Expected a string");
    assert_eq!(store.count("partnerlead"), 0);
}
