//! API integration tests against a running server.
//!
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

fn unique_isbn(prefix: &str) -> String {
    format!(
        "{}-{}",
        prefix,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_book_then_duplicate_isbn() {
    let client = Client::new();
    let isbn = unique_isbn("dup");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({"title": "T", "author": "A", "isbn": isbn}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    assert!(created["id"].is_i64());

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({"title": "T2", "author": "A2", "isbn": isbn}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"], json!(["Isbn already exists"]));
}

#[tokio::test]
#[ignore]
async fn test_loan_lifecycle() {
    let client = Client::new();
    let isbn = unique_isbn("loan");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({"title": "T", "author": "A", "isbn": isbn}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // First loan succeeds
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({"isbn": isbn, "customer": "X", "customer_email": "x@example.com"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse response");
    let loan_id = loan["id"].as_i64().expect("No loan id");

    // Second loan on the same book is rejected
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({"isbn": isbn, "customer": "Y", "customer_email": "y@example.com"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"], json!(["Book already loaned."]));

    // Returning the book restores availability
    let response = client
        .patch(format!("{}/loans/{}", BASE_URL, loan_id))
        .json(&json!({"returned": true}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({"isbn": isbn, "customer": "Y", "customer_email": "y@example.com"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_patch_unknown_loan_returns_404() {
    let client = Client::new();

    let response = client
        .patch(format!("{}/loans/999999999", BASE_URL))
        .json(&json!({"returned": true}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
