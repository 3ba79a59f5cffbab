//! API integration tests
//!
//! These tests run against a live server with a migrated database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register a fresh user and return (token, user_id)
async fn register_and_login(client: &Client) -> (String, String) {
    let email = format!("reader-{}@example.com", Uuid::new_v4());

    let response = client
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({
            "name": "Test Reader",
            "email": email,
            "password": "secret99"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    let user_id = body["id"].as_str().expect("No user id").to_string();

    let response = client
        .post(format!("{}/users/token", BASE_URL))
        .json(&json!({ "email": email, "password": "secret99" }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["access_token"].as_str().expect("No token").to_string();

    (token, user_id)
}

/// Register a publisher for the given token's user
async fn register_publisher(client: &Client, token: &str) {
    let response = client
        .post(format!("{}/publishers", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "company_name": format!("Press {}", Uuid::new_v4()),
            "contact_email": "press@example.com"
        }))
        .send()
        .await
        .expect("Failed to send publisher request");
    assert_eq!(response.status(), 201);
}

/// Create a book under the token's publisher and return its id
async fn create_book(client: &Client, token: &str, title: &str, quantity: i64) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "author": "A. Author",
            "category": "Fiction",
            "quantity": quantity
        }))
        .send()
        .await
        .expect("Failed to send book request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse book response");
    body["id"].as_i64().expect("No book id")
}

async fn get_book(client: &Client, token: &str, id: i64) -> Value {
    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get book");
    assert_eq!(response.status(), 200);
    response.json().await.expect("Failed to parse book")
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
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/users/token", BASE_URL))
        .json(&json!({
            "email": "nobody@example.com",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_requests_without_token_are_rejected() {
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
async fn test_duplicate_email_rejected() {
    let client = Client::new();
    let email = format!("dup-{}@example.com", Uuid::new_v4());

    for expected in [201, 409] {
        let response = client
            .post(format!("{}/users/register", BASE_URL))
            .json(&json!({
                "name": "Dup",
                "email": email,
                "password": "secret99"
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_lend_and_return_round_trip() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;
    register_publisher(&client, &token).await;

    let book_id = create_book(&client, &token, "Echoes of the Past", 11).await;

    let before = get_book(&client, &token, book_id).await;
    assert_eq!(before["quantity"], 11);
    let borrowed_count_before = before["borrowed_count"].as_i64().unwrap();

    // Borrow
    let response = client
        .post(format!("{}/lends", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "borrowed_date": "2023-03-10" }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);

    let lend: Value = response.json().await.expect("Failed to parse lend");
    assert_eq!(lend["status"], "borrowed");
    assert!(lend["returned_date"].is_null());

    let during = get_book(&client, &token, book_id).await;
    assert_eq!(during["quantity"], 10);
    assert_eq!(during["borrowed_count"], borrowed_count_before + 1);

    // Return
    let response = client
        .post(format!("{}/lends/return", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "return_date": "2023-03-20" }))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse return");
    assert_eq!(body["lend"]["status"], "returned");
    assert_eq!(body["lend"]["returned_date"], "2023-03-20");

    let after = get_book(&client, &token, book_id).await;
    assert_eq!(after["quantity"], 11);
    // The return does not touch the lifetime counter
    assert_eq!(after["borrowed_count"], borrowed_count_before + 1);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_active_loan_rejected() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;
    register_publisher(&client, &token).await;

    let book_id = create_book(&client, &token, "One Per Reader", 5).await;

    for expected in [201, 409] {
        let response = client
            .post(format!("{}/lends", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({ "book_id": book_id, "borrowed_date": "2023-05-01" }))
            .send()
            .await
            .expect("Failed to send lend request");
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_out_of_stock_rejected() {
    let client = Client::new();
    let (owner_token, _) = register_and_login(&client).await;
    register_publisher(&client, &owner_token).await;
    let (other_token, _) = register_and_login(&client).await;

    let book_id = create_book(&client, &owner_token, "Single Copy", 1).await;

    let response = client
        .post(format!("{}/lends", BASE_URL))
        .header("Authorization", format!("Bearer {}", owner_token))
        .json(&json!({ "book_id": book_id, "borrowed_date": "2023-05-01" }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/lends", BASE_URL))
        .header("Authorization", format!("Bearer {}", other_token))
        .json(&json!({ "book_id": book_id, "borrowed_date": "2023-05-02" }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_lends_take_the_last_copy_once() {
    let client = Client::new();
    let (owner_token, _) = register_and_login(&client).await;
    register_publisher(&client, &owner_token).await;
    let (other_token, _) = register_and_login(&client).await;

    let book_id = create_book(&client, &owner_token, "Contended Copy", 1).await;

    let lend = |token: String| {
        let client = client.clone();
        async move {
            client
                .post(format!("{}/lends", BASE_URL))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({ "book_id": book_id, "borrowed_date": "2023-06-01" }))
                .send()
                .await
                .expect("Failed to send lend request")
                .status()
                .as_u16()
        }
    };

    let (a, b) = tokio::join!(lend(owner_token.clone()), lend(other_token));

    let mut outcomes = [a, b];
    outcomes.sort();
    assert_eq!(outcomes, [201, 409]);

    let book = get_book(&client, &owner_token, book_id).await;
    assert_eq!(book["quantity"], 0);
}

#[tokio::test]
#[ignore]
async fn test_return_is_not_idempotent() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;
    register_publisher(&client, &token).await;

    let book_id = create_book(&client, &token, "Come Back Once", 3).await;

    let response = client
        .post(format!("{}/lends", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "borrowed_date": "2023-07-01" }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);

    // First return closes the loan; the second finds it already returned
    for expected in [200, 409] {
        let response = client
            .post(format!("{}/lends/return", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({ "book_id": book_id, "return_date": "2023-07-05" }))
            .send()
            .await
            .expect("Failed to send return request");
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_book_history_empty_for_fresh_book() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;
    register_publisher(&client, &token).await;

    let book_id = create_book(&client, &token, "Never Borrowed", 2).await;

    let response = client
        .get(format!("{}/books/{}/history", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send history request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse history");
    assert_eq!(body["book"]["id"].as_i64().unwrap(), book_id);
    assert_eq!(body["history"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_user_history_lists_borrowed_books() {
    let client = Client::new();
    let (token, user_id) = register_and_login(&client).await;
    register_publisher(&client, &token).await;

    let book_id = create_book(&client, &token, "In My History", 2).await;

    let response = client
        .post(format!("{}/lends", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "borrowed_date": "2023-09-01" }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/users/{}/history", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send history request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse history");
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["book"]["title"], "In My History");
    assert_eq!(history[0]["status"], "borrowed");
}

#[tokio::test]
#[ignore]
async fn test_yearly_summary() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;
    register_publisher(&client, &token).await;

    let book_id = create_book(&client, &token, "Year Marker", 2).await;

    let response = client
        .post(format!("{}/lends", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "borrowed_date": "2023-11-11" }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/stats/yearly-summary/2023", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send stats request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse summary");
    assert_eq!(body["year"], 2023);
    assert!(body["total_borrows"].as_i64().unwrap() >= 1);
    assert!(body["most_borrowed_book_title"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_yearly_summary_no_data() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;

    let response = client
        .get(format!("{}/stats/yearly-summary/1900", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send stats request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_soft_deleted_book_cannot_be_borrowed() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;
    register_publisher(&client, &token).await;

    let book_id = create_book(&client, &token, "Gone Soon", 2).await;

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);

    let response = client
        .post(format!("{}/lends", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id, "borrowed_date": "2023-05-01" }))
        .send()
        .await
        .expect("Failed to send lend request");
    assert_eq!(response.status(), 404);
}
