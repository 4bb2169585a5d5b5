//! REST surface tests.
//!
//! Starts an axum server on an ephemeral port and drives it with reqwest.

use serde_json::{json, Value};

use crate::support::{in_memory_service, insert_all, jade, snake, start_server};

async fn seeded_server() -> String {
    let service = in_memory_service();
    insert_all(service.store(), vec![jade(), snake()]).await;
    start_server(service).await
}

async fn get_json(url: String) -> (u16, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

fn names(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_check() {
    let base = start_server(in_memory_service()).await;
    let (status, body) = get_json(format!("{base}/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn list_wraps_plants_with_a_count() {
    let base = seeded_server().await;
    let (status, body) = get_json(format!("{base}/plants")).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(names(&body), vec!["Jade Plant", "Snake Plant"]);

    let jade = &body["data"][0];
    assert_eq!(jade["_id"].as_str().unwrap().len(), 24);
    assert_eq!(jade["inStock"], true);
    assert_eq!(jade["categories"], json!(["Succulent,Indoor"]));
    assert!(jade["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn list_applies_query_parameters() {
    let base = seeded_server().await;

    let (_, body) = get_json(format!("{base}/plants?search=snake")).await;
    assert_eq!(names(&body), vec!["Snake Plant"]);

    let (_, body) = get_json(format!("{base}/plants?inStock=true")).await;
    assert_eq!(names(&body), vec!["Jade Plant"]);

    // Anything other than the literal "true" means out of stock.
    let (_, body) = get_json(format!("{base}/plants?inStock=yes")).await;
    assert_eq!(names(&body), vec!["Snake Plant"]);

    let (_, body) = get_json(format!("{base}/plants?sort=price&order=desc")).await;
    assert_eq!(names(&body), vec!["Jade Plant", "Snake Plant"]);

    let (_, body) = get_json(format!("{base}/plants?category=all&search=plant")).await;
    assert_eq!(body["count"], 2);

    let (_, body) = get_json(format!("{base}/plants?category=Indoor,Low%20Light")).await;
    assert_eq!(names(&body), vec!["Snake Plant"]);
}

#[tokio::test]
async fn repeated_query_parameter_gets_the_error_envelope() {
    let base = seeded_server().await;
    let resp = reqwest::get(format!("{base}/plants?category=a&category=b")).await.unwrap();

    assert_eq!(resp.status(), 500);
    assert!(resp.headers()["content-type"].to_str().unwrap().starts_with("application/json"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server error");
    assert!(body["error"].as_str().unwrap().starts_with("invalid query"));
}

#[tokio::test]
async fn put_with_null_description_clears_it() {
    let service = in_memory_service();
    let saved = insert_all(service.store(), vec![jade()]).await.remove(0);
    let base = start_server(service).await;
    let url = format!("{base}/plants/{}", saved.id);

    let resp = reqwest::Client::new()
        .put(&url)
        .json(&json!({
            "name": "Jade Plant",
            "price": "₹899.99",
            "categories": ["Succulent,Indoor"],
            "description": null
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (_, body) = get_json(url).await;
    assert!(body["data"].get("description").is_none());
}

#[tokio::test]
async fn categories_endpoint_counts_labels() {
    let base = seeded_server().await;
    let (status, body) = get_json(format!("{base}/plants/categories/list")).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let mut data = body["data"].as_array().unwrap().clone();
    data.sort_by_key(|c| c["name"].as_str().unwrap().to_string());
    assert_eq!(
        data,
        vec![
            json!({ "name": "Indoor,Low Light", "count": 1 }),
            json!({ "name": "Succulent,Indoor", "count": 1 }),
        ]
    );
}

#[tokio::test]
async fn create_get_update_delete() {
    let base = start_server(in_memory_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/plants"))
        .json(&json!({
            "name": "  Peace Lily ",
            "price": "₹1299.99",
            "categories": ["Indoor", "Flowering"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Peace Lily");
    assert_eq!(body["data"]["inStock"], true);
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = get_json(format!("{base}/plants/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["_id"], id.as_str());

    let resp = client
        .put(format!("{base}/plants/{id}"))
        .json(&json!({
            "name": "Peace Lily",
            "price": "₹1099.99",
            "categories": ["Indoor"],
            "inStock": false,
            "_id": "000000000000000000000000"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["_id"], id.as_str());
    assert_eq!(body["data"]["price"], "₹1099.99");
    assert_eq!(body["data"]["inStock"], false);
    assert_eq!(body["data"]["categories"], json!(["Indoor"]));

    let resp = client.delete(format!("{base}/plants/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "message": "Plant deleted successfully" }));

    let (status, body) = get_json(format!("{base}/plants/{id}")).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "success": false, "message": "Plant not found" }));
}

#[tokio::test]
async fn invalid_create_lists_every_field_error() {
    let base = start_server(in_memory_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/plants"))
        .json(&json!({ "name": "", "categories": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation error");

    let paths: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["name", "price", "categories"]);

    let (_, body) = get_json(format!("{base}/plants")).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let base = start_server(in_memory_service()).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/plants"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let base = seeded_server().await;
    let client = reqwest::Client::new();

    let (status, _) = get_json(format!("{base}/plants/ffffffffffffffffffffffff")).await;
    assert_eq!(status, 404);

    let resp = client
        .put(format!("{base}/plants/ffffffffffffffffffffffff"))
        .json(&json!({ "name": "X", "price": "1", "categories": ["a"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let (status, body) = get_json(format!("{base}/plants/not-an-id")).await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server error");
    assert!(body["error"].as_str().unwrap().contains("Cast to ObjectId failed"));

    let resp = client.delete(format!("{base}/plants/123")).send().await.unwrap();
    assert_eq!(resp.status(), 500);
}
