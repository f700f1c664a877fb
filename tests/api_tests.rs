//! API integration tests
//!
//! These run against a live server (RUN_MODE/DATABASE_URL as configured).
//! Tokens are minted locally with the same secret the server verifies,
//! since token issuance belongs to the external identity provider.

use std::time::{SystemTime, UNIX_EPOCH};

use libris_server::models::user::UserClaims;
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".to_string())
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_secs() as i64
}

fn token_for(user_id: i32, username: &str, is_admin: bool) -> String {
    let claims = UserClaims {
        sub: username.to_string(),
        user_id,
        is_admin,
        exp: now_secs() + 3600,
        iat: now_secs(),
    };
    claims.create_token(&jwt_secret()).expect("Failed to mint token")
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Create a user through the API and return (id, token minted for it)
async fn create_test_user(client: &Client, admin_token: &str, is_admin: bool) -> (i32, String) {
    let username = unique("patron");
    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.org", username),
            "is_admin": is_admin
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["id"].as_i64().expect("No user ID") as i32;
    let token = token_for(id, &username, is_admin);
    (id, token)
}

/// Bootstrap an admin token. Admin-gated endpoints only check the claims,
/// so an out-of-band admin identity is enough to create real rows.
fn bootstrap_admin_token() -> String {
    token_for(1, "admin", true)
}

async fn create_test_book(client: &Client, admin_token: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "title": unique("Test Book"),
            "author": unique("Author"),
            "category": "Fiction",
            "publisher": unique("Publisher"),
            "isbn": "9780000000002"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No book ID")
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
async fn test_missing_token_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_create_and_search_book() {
    let client = Client::new();
    let admin = bootstrap_admin_token();

    let title = unique("Dune");
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "title": title,
            "author": "Frank Herbert",
            "category": "Science Fiction",
            "publisher": "Chilton Books",
            "isbn": "9780441013593"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["author"], "Frank Herbert");

    // Substring search finds it
    let response = client
        .get(format!("{}/books?search={}", BASE_URL, title.to_lowercase()))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let books: Value = response.json().await.expect("Failed to parse response");
    assert!(books
        .as_array()
        .expect("Expected array")
        .iter()
        .any(|b| b["title"] == title.as_str()));
}

#[tokio::test]
#[ignore]
async fn test_blank_author_name_is_rejected() {
    let client = Client::new();
    let admin = bootstrap_admin_token();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "title": unique("Book"),
            "author": "   ",
            "category": "Fiction",
            "publisher": "Nobody"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrow_twice_conflicts() {
    let client = Client::new();
    let admin = bootstrap_admin_token();
    let (_user_id, user_token) = create_test_user(&client, &admin, false).await;
    let book_id = create_test_book(&client, &admin).await;

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", user_token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    // Second borrow without a return must conflict
    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", user_token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_return_is_not_idempotent() {
    let client = Client::new();
    let admin = bootstrap_admin_token();
    let (user_id, user_token) = create_test_user(&client, &admin, false).await;
    let book_id = create_test_book(&client, &admin).await;

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", user_token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["id"].as_i64().expect("No borrow ID");

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", user_token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_overdue"], false);

    // Second return must conflict
    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", user_token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // And the record now shows up in the user's history
    let response = client
        .get(format!("{}/users/{}/borrows/history", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", user_token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let history: Value = response.json().await.expect("Failed to parse response");
    assert!(history
        .as_array()
        .expect("Expected array")
        .iter()
        .any(|r| r["id"].as_i64() == Some(borrow_id)));
}

#[tokio::test]
#[ignore]
async fn test_return_by_other_user_is_forbidden() {
    let client = Client::new();
    let admin = bootstrap_admin_token();
    let (_owner_id, owner_token) = create_test_user(&client, &admin, false).await;
    let (_other_id, other_token) = create_test_user(&client, &admin, false).await;
    let book_id = create_test_book(&client, &admin).await;

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", format!("Bearer {}", owner_token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["id"].as_i64().expect("No borrow ID");

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", other_token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_author_delete_cascades_to_books() {
    let client = Client::new();
    let admin = bootstrap_admin_token();

    let author = unique("Doomed Author");
    let title = unique("Doomed Book");
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "title": title,
            "author": author,
            "category": "Fiction",
            "publisher": unique("Publisher")
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("Failed to parse response");
    let book_id = book["id"].as_i64().expect("No book ID");

    // Find the author id from the listing
    let response = client
        .get(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    let authors: Value = response.json().await.expect("Failed to parse response");
    let author_id = authors
        .as_array()
        .expect("Expected array")
        .iter()
        .find(|a| a["name"] == author.as_str())
        .and_then(|a| a["id"].as_i64())
        .expect("Author not listed");

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["books_deleted"].as_u64(), Some(1));

    // The book is gone from the catalog
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_dashboard_shape() {
    let client = Client::new();
    let admin = bootstrap_admin_token();

    let response = client
        .get(format!("{}/stats/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_books"].is_number());
    assert!(body["open_borrows"].is_number());
    assert!(body["overdue_borrows"].is_number());
    assert!(body["average_borrow_days"].is_number());
    assert!(body["latest_books"].is_array());
    assert!(body["recent_borrows"].is_array());
    assert!(body["top_authors"].is_array());
    assert!(body["category_counts"].is_array());
    assert!(body["latest_books"].as_array().expect("array").len() <= 5);
    assert!(body["top_authors"].as_array().expect("array").len() <= 5);
    // A healthy store never sets the degradation marker
    assert!(body.get("error").is_none());
}
