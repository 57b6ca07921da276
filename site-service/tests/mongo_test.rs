mod common;

use common::TestApp;
use mongodb::bson::{doc, oid::ObjectId, Document};
use reqwest::{Client, StatusCode};
use serde_json::json;

#[tokio::test]
#[ignore = "Requires MongoDB at localhost:27017"]
async fn blog_round_trip_against_mongodb() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let payload = json!({
        "title": "Sauna evenings",
        "slug": "sauna-evenings",
        "content": "Every Thursday.",
        "tags": ["sauna"],
        "lang": "fi"
    });

    let response = client
        .post(format!("{}/api/blog", app.address))
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let id = ObjectId::parse_str(body["id"].as_str().unwrap()).expect("id is not an ObjectId");

    let stored = app
        .store
        .database()
        .collection::<Document>("blogpost")
        .find_one(doc! { "_id": id }, None)
        .await
        .unwrap()
        .expect("Post not found in DB");
    assert_eq!(stored.get_str("slug").unwrap(), "sauna-evenings");

    let listed: serde_json::Value = client
        .get(format!("{}/api/blog?lang=fi", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(listed[0]["title"], "Sauna evenings");
    assert_eq!(listed[0]["excerpt"], serde_json::Value::Null);

    let diagnostics: serde_json::Value = client
        .get(format!("{}/test", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(diagnostics["database"], "✅ Connected & Working");

    app.cleanup().await;
}
