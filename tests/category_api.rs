mod common;

use common::TestServer;
use serde_json::{json, Value};

#[tokio::test]
async fn create_rejects_duplicate_names_with_conflict() {
    let srv = TestServer::start().await;

    let first = srv
        .as_admin(srv.client.post(srv.url("/api/v1/category/create-category")))
        .json(&json!({ "name": "Men's Shoes & Boots!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 201);
    let body: Value = first.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "New category created");
    assert_eq!(body["category"]["slug"], "mens-shoes-boots");

    let second = srv
        .as_admin(srv.client.post(srv.url("/api/v1/category/create-category")))
        .json(&json!({ "name": "Men's Shoes & Boots!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 409);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Category Already Exists");

    let list: Value = srv
        .client
        .get(srv.url("/api/v1/category/get-category"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["category"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_requires_a_name() {
    let srv = TestServer::start().await;
    for body in [json!({}), json!({ "name": "   " })] {
        let resp = srv
            .as_admin(srv.client.post(srv.url("/api/v1/category/create-category")))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Name is required");
    }
}

#[tokio::test]
async fn writes_need_an_admin() {
    let srv = TestServer::start().await;

    let anonymous = srv
        .client
        .post(srv.url("/api/v1/category/create-category"))
        .json(&json!({ "name": "Garden" }))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), 401);

    let user = srv
        .as_user(srv.client.post(srv.url("/api/v1/category/create-category")))
        .json(&json!({ "name": "Garden" }))
        .send()
        .await
        .unwrap();
    assert_eq!(user.status(), 401);
    let body: Value = user.json().await.unwrap();
    assert_eq!(body["message"], "UnAuthorized Access");
}

#[tokio::test]
async fn update_reslugs_and_unknown_ids_read_as_null() {
    let srv = TestServer::start().await;
    let id = srv.create_category("Garden").await;

    let resp = srv
        .as_admin(srv.client.put(srv.url(&format!("/api/v1/category/update-category/{}", id))))
        .json(&json!({ "name": "Garden Tools" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["category"]["name"], "Garden Tools");
    assert_eq!(body["category"]["slug"], "Garden-Tools");

    let single: Value = srv
        .client
        .get(srv.url("/api/v1/category/single-category/Garden-Tools"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(single["category"]["_id"], id.to_string());

    let missing: Value = srv
        .as_admin(srv.client.put(srv.url("/api/v1/category/update-category/not-an-id")))
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missing["success"], true);
    assert!(missing["category"].is_null());
}

#[tokio::test]
async fn delete_succeeds_even_for_unknown_ids() {
    let srv = TestServer::start().await;
    let id = srv.create_category("Kitchen").await;

    for target in [id.to_string(), uuid::Uuid::new_v4().to_string(), "junk".to_string()] {
        let resp = srv
            .as_admin(srv.client.delete(srv.url(&format!("/api/v1/category/delete-category/{}", target))))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Category Deleted Successfully");
    }

    let single: Value = srv
        .client
        .get(srv.url("/api/v1/category/single-category/kitchen"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(single["category"].is_null());
}

#[tokio::test]
async fn missing_body_is_a_missing_name() {
    let srv = TestServer::start().await;

    let resp = srv
        .as_admin(srv.client.post(srv.url("/api/v1/category/create-category")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Name is required");

    let id = srv.create_category("Garden").await;
    let resp = srv
        .as_admin(srv.client.put(srv.url(&format!("/api/v1/category/update-category/{}", id))))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let garbled = srv
        .as_admin(srv.client.post(srv.url("/api/v1/category/create-category")))
        .header("content-type", "application/json")
        .body("{name:")
        .send()
        .await
        .unwrap();
    assert_eq!(garbled.status(), 422);
}
