//! API integration tests.
//!
//! These exercise a running server with a seeded database; start one with
//! `cargo run` against a scratch Postgres, then run
//! `cargo test -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const OPERATOR_TOKEN: &str = "change-this-operator-token";

fn operator(client: &Client, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
    client.request(method, url).bearer_auth(OPERATOR_TOKEN)
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
async fn test_list_groups() {
    let client = Client::new();

    let response = client
        .get(format!("{}/groups", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_group_books_have_availability() {
    let client = Client::new();

    let response = client
        .get(format!("{}/groups/1/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    for book in body.as_array().expect("array of books") {
        assert!(book["available"].as_i64().expect("available count") > 0);
    }
}

#[tokio::test]
#[ignore]
async fn test_unknown_group_is_404() {
    let client = Client::new();

    let response = client
        .get(format!("{}/groups/999999/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_student_search_word_prefix() {
    let client = Client::new();

    let response = client
        .get(format!("{}/search/students", BASE_URL))
        .query(&[("q", "ал")])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let students = body.as_array().expect("array of students");
    assert!(students.len() <= 20);
}

#[tokio::test]
#[ignore]
async fn test_submit_with_mismatched_code_count_is_400() {
    let client = Client::new();

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "student_id": 1,
            "book_id": 1,
            "quantity": 2,
            "copy_codes": ["1-01"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_submit_with_wrong_book_code_is_404() {
    let client = Client::new();

    // "2-01" exists, but under book 2; resolving it against book 1 fails
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "student_id": 1,
            "book_id": 1,
            "quantity": 1,
            "copy_codes": ["2-01"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_reject_deletes_pending_request() {
    let client = Client::new();

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "student_id": 1,
            "book_id": 1,
            "quantity": 1,
            "copy_codes": ["1-10"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["request"]["id"].as_i64().expect("request id");
    let number = body["request"]["request_number"]
        .as_str()
        .expect("request number")
        .to_string();

    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/reject", BASE_URL, id),
    )
    .send()
    .await
    .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    // The request is gone, by number and by id
    let response = operator(
        &client,
        reqwest::Method::GET,
        format!("{}/requests/find", BASE_URL),
    )
    .query(&[("query", number)])
    .send()
    .await
    .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let response = operator(
        &client,
        reqwest::Method::GET,
        format!("{}/requests/find", BASE_URL),
    )
    .query(&[("query", id.to_string())])
    .send()
    .await
    .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_returned_copies_are_usable_again() {
    let client = Client::new();

    // Walk one copy through the full lifecycle
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "student_id": 1,
            "book_id": 1,
            "quantity": 1,
            "copy_codes": ["1-20"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["request"]["id"].as_i64().expect("request id");

    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/confirm", BASE_URL, id),
    )
    .send()
    .await
    .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/return", BASE_URL, id),
    )
    .json(&json!({ "scanned_codes": ["1-20"] }))
    .send()
    .await
    .expect("Failed to send request");
    assert!(response.status().is_success());

    // The released copy can be requested again right away
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "student_id": 2,
            "book_id": 1,
            "quantity": 1,
            "copy_codes": ["1-20"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_malformed_return_body_is_400() {
    let client = Client::new();

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "student_id": 1,
            "book_id": 1,
            "quantity": 1,
            "copy_codes": ["1-30"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["request"]["id"].as_i64().expect("request id");

    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/confirm", BASE_URL, id),
    )
    .send()
    .await
    .expect("Failed to send request");
    assert!(response.status().is_success());

    // A body that is not valid JSON must not pass as a codeless return
    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/return", BASE_URL, id),
    )
    .header("content-type", "application/json")
    .body("{ scanned_codes: ")
    .send()
    .await
    .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // The request is untouched and still returnable
    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/return", BASE_URL, id),
    )
    .send()
    .await
    .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_requests_journal_needs_operator_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/requests", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let response = operator(
        &client,
        reqwest::Method::GET,
        format!("{}/requests", BASE_URL),
    )
    .send()
    .await
    .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_confirm_reject_state_machine() {
    let client = Client::new();

    // Submit a fresh request for one copy
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "student_id": 1,
            "book_id": 1,
            "quantity": 1,
            "copy_codes": ["1-01"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["request"]["id"].as_i64().expect("request id");
    let number = body["request"]["request_number"]
        .as_str()
        .expect("request number")
        .to_string();
    assert_eq!(body["request"]["status"], "pending");

    // Find it back by its number, with a leading '#'
    let response = operator(
        &client,
        reqwest::Method::GET,
        format!("{}/requests/find", BASE_URL),
    )
    .query(&[("query", format!("#{}", number))])
    .send()
    .await
    .expect("Failed to send request");

    assert!(response.status().is_success());

    // Confirm the issue
    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/confirm", BASE_URL, id),
    )
    .send()
    .await
    .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["request"]["status"], "issued");

    // Confirming twice reports the state conflict
    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/confirm", BASE_URL, id),
    )
    .send()
    .await
    .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // Rejecting an issued request also fails
    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/reject", BASE_URL, id),
    )
    .send()
    .await
    .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // Return it with the matching scanned code
    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/return", BASE_URL, id),
    )
    .json(&json!({ "scanned_codes": ["1-01"] }))
    .send()
    .await
    .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["request"]["status"], "returned");
}

#[tokio::test]
#[ignore]
async fn test_conflicting_confirmations_are_all_or_nothing() {
    let client = Client::new();

    // Two pending requests naming the same copy
    let first = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "student_id": 1,
            "book_id": 1,
            "quantity": 2,
            "copy_codes": ["1-02", "1-03"]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);
    let first: Value = first.json().await.expect("Failed to parse response");

    let second = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "student_id": 2,
            "book_id": 1,
            "quantity": 2,
            "copy_codes": ["1-03", "1-04"]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 201);
    let second: Value = second.json().await.expect("Failed to parse response");

    // First confirmation wins both copies
    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/confirm", BASE_URL, first["request"]["id"]),
    )
    .send()
    .await
    .expect("Failed to send request");
    assert!(response.status().is_success());

    // Second fails naming the contested copy, and holds nothing
    let response = operator(
        &client,
        reqwest::Method::POST,
        format!("{}/requests/{}/confirm", BASE_URL, second["request"]["id"]),
    )
    .send()
    .await
    .expect("Failed to send request");

    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().expect("message").contains("1-03"));
}
