//! API integration tests (need a running server and database)

use reqwest::{multipart, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

// 1x1 transparent PNG
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

async fn create_book(client: &Client) -> String {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "author": "Integration Test Author",
            "publisher": "Test Press",
            "isbn": "978-0-00-000000-0"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No book ID").to_string()
}

async fn create_user(client: &Client) -> String {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "name": "Integration Test User",
            "phone": "555-0100",
            "email": "integration@example.org"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No user ID").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
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
async fn test_readiness() {
    let response = Client::new()
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_book_crud_and_cover() {
    let client = Client::new();
    let book_id = create_book(&client).await;

    // New books show the placeholder cover
    let body: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["has_photo"], false);
    assert!(body["cover"].as_str().unwrap().starts_with("data:image;base64,"));

    // Upload a cover
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(TINY_PNG.to_vec()).file_name("cover.png"),
    );
    let response = client
        .post(format!("{}/books/{}/cover?width=8", BASE_URL, book_id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["has_photo"], true);
    assert!(body.get("photo").is_none());

    // Partial update keeps the other fields
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .json(&json!({ "publisher": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["publisher"].is_null());
    assert_eq!(body["author"], "Integration Test Author");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_book_search_filters() {
    let client = Client::new();
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "author": "Search Filter Author", "isbn": "0-8044-2957-X" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let book: Value = response.json().await.expect("Failed to parse response");

    let search = |query: &'static str| {
        let client = client.clone();
        async move {
            let body: Value = client
                .get(format!("{}/books?{}", BASE_URL, query))
                .send()
                .await
                .expect("Failed to send request")
                .json()
                .await
                .expect("Failed to parse response");
            body["total"].as_i64().expect("No total")
        }
    };

    // ISBN match ignores case
    assert!(search("isbn=0-8044-2957-x").await >= 1);
    // `%` and `_` are not wildcards
    assert_eq!(search("author=search%25filter").await, 0);
    assert_eq!(search("author=search_filter").await, 0);
    assert!(search("author=search%20filter").await >= 1);

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book["id"].as_str().expect("No book ID")))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_empty_cover_upload() {
    let client = Client::new();
    let book_id = create_book(&client).await;

    let form = multipart::Form::new().part("file", multipart::Part::bytes(Vec::new()).file_name("empty.png"));
    let response = client
        .post(format!("{}/books/{}/cover", BASE_URL, book_id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_create_user_invalid_email() {
    let response = Client::new()
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "name": "Nobody",
            "phone": "555-0199",
            "email": "not-an-email"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_loan_lifecycle() {
    let client = Client::new();
    let book_id = create_book(&client).await;
    let user_id = create_user(&client).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "user_id": user_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let loan: Value = response.json().await.expect("Failed to parse response");
    let loan_id = loan["id"].as_str().expect("No loan ID").to_string();
    assert_eq!(loan["user_name"], "Integration Test User");
    assert_eq!(loan["is_returned"], false);

    // Referenced rows cannot be deleted
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = client
        .get(format!("{}/loans?user_id={}&active=true", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["total"], 1);

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let loan: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(loan["is_returned"], true);

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Cleanup
    for path in [
        format!("loans/{}", loan_id),
        format!("books/{}", book_id),
        format!("users/{}", user_id),
    ] {
        let response = client
            .delete(format!("{}/{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}

#[tokio::test]
#[ignore]
async fn test_loan_with_unknown_user() {
    let response = Client::new()
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "user_id": "00000000-0000-0000-0000-000000000000",
            "book_id": "00000000-0000-0000-0000-000000000000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let body: Value = Client::new()
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(body["users"].is_number());
    assert!(body["books"].is_number());
    assert!(body["loans"].is_number());
    assert_eq!(body["labels"], json!(["users", "books", "loans"]));
}

#[tokio::test]
#[ignore]
async fn test_loan_form_options() {
    let body: Value = Client::new()
        .get(format!("{}/loans/options", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(body["users"].is_array());
    assert!(body["books"].is_array());
}
