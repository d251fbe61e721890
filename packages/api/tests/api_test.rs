// ABOUTME: End-to-end API tests over an in-memory database
// ABOUTME: Exercises signup, login, product creation, invites, and access denial

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use canopy_ai::AiService;
use canopy_api::{create_router, AppState};
use canopy_auth::JwtAuth;
use canopy_storage::connect_in_memory;
use sqlx::SqlitePool;

async fn setup() -> (Router, SqlitePool) {
    let pool = connect_in_memory().await.unwrap();
    let state = AppState::new(pool.clone(), JwtAuth::new(b"test-secret"), AiService::new(None));
    (create_router(state), pool)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    authed(Request::post(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    authed(Request::get(uri), Some(token)).body(Body::empty()).unwrap()
}

fn delete_authed(uri: &str, token: &str) -> Request<Body> {
    authed(Request::delete(uri), Some(token))
        .body(Body::empty())
        .unwrap()
}

fn authed(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(t) => builder.header(header::AUTHORIZATION, format!("Bearer {}", t)),
        None => builder,
    }
}

/// Signup a user, approve them directly in the database, and log in.
/// Returns (user_id, token).
async fn signup_and_login(router: &Router, pool: &SqlitePool, email: &str) -> (String, String) {
    let (status, body) = send(
        router,
        post_json(
            "/api/auth/signup",
            None,
            json!({ "email": email, "password": "hunter2", "display_name": email }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["data"]["id"].as_str().unwrap().to_string();

    // Seed approval; the approval endpoint itself needs an approved caller.
    sqlx::query("UPDATE users SET approved = 1 WHERE id = ?")
        .bind(&user_id)
        .execute(pool)
        .await
        .unwrap();

    let (status, body) = send(
        router,
        post_json(
            "/api/auth/login",
            None,
            json!({ "email": email, "password": "hunter2" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    (user_id, token)
}

#[tokio::test]
async fn test_signup_login_product_invite_and_denial() {
    let (router, pool) = setup().await;

    let (_a_id, a_token) = signup_and_login(&router, &pool, "a@example.com").await;
    let (b_id, b_token) = signup_and_login(&router, &pool, "b@example.com").await;

    // A creates a product
    let (status, body) = send(
        &router,
        post_json(
            "/api/products",
            Some(&a_token),
            json!({ "name": "Checkout" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["iteration_number"], 1);

    // B cannot see it yet
    let (status, _) = send(
        &router,
        get_authed(&format!("/api/products/{}", product_id), &b_token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A invites B as editor
    let (status, _) = send(
        &router,
        post_json(
            &format!("/api/products/{}/access", product_id),
            Some(&a_token),
            json!({ "user_id": b_id, "role": "editor" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Now B can read it
    let (status, body) = send(
        &router,
        get_authed(&format!("/api/products/{}", product_id), &b_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Checkout");

    // But B cannot delete it: editor, not owner
    let (status, body) = send(
        &router,
        delete_authed(&format!("/api/products/{}", product_id), &b_token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    // The owner can
    let (status, _) = send(
        &router,
        delete_authed(&format!("/api/products/{}", product_id), &a_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unapproved_user_cannot_login() {
    let (router, _pool) = setup().await;

    let (status, _) = send(
        &router,
        post_json(
            "/api/auth/signup",
            None,
            json!({ "email": "new@example.com", "password": "pw", "display_name": "New" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &router,
        post_json(
            "/api/auth/login",
            None,
            json!({ "email": "new@example.com", "password": "pw" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Account pending approval");
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let (router, _pool) = setup().await;

    let request = || {
        post_json(
            "/api/auth/signup",
            None,
            json!({ "email": "dup@example.com", "password": "pw", "display_name": "Dup" }),
        )
    };

    let (status, _) = send(&router, request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&router, request()).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (router, _pool) = setup().await;

    let request = Request::get("/api/products").body(Body::empty()).unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_unauthorized() {
    let (router, pool) = setup().await;
    let (user_id, token) = signup_and_login(&router, &pool, "gone@example.com").await;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(&router, get_authed("/api/users/me", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_reminder_task_link_is_validated() {
    let (router, pool) = setup().await;
    let (_a_id, a_token) = signup_and_login(&router, &pool, "a@example.com").await;
    let (_b_id, b_token) = signup_and_login(&router, &pool, "b@example.com").await;

    let (_, body) = send(
        &router,
        post_json("/api/products", Some(&a_token), json!({ "name": "Checkout" })),
    )
    .await;
    let product_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        post_json(
            &format!("/api/products/{}/tasks", product_id),
            Some(&a_token),
            json!({ "title": "Ship it" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    // A link to a task that does not exist is a 404, not a constraint failure
    let (status, _) = send(
        &router,
        post_json(
            "/api/reminders",
            Some(&a_token),
            json!({
                "message": "Follow up",
                "remind_at": "2030-01-01T00:00:00Z",
                "task_id": "no-such-task"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Linking a task requires viewer access on its product
    let (status, _) = send(
        &router,
        post_json(
            "/api/reminders",
            Some(&b_token),
            json!({
                "message": "Follow up",
                "remind_at": "2030-01-01T00:00:00Z",
                "task_id": task_id
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A valid link goes through
    let (status, body) = send(
        &router,
        post_json(
            "/api/reminders",
            Some(&a_token),
            json!({
                "message": "Follow up",
                "remind_at": "2030-01-01T00:00:00Z",
                "task_id": task_id
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["task_id"], json!(task_id));
}

#[tokio::test]
async fn test_iteration_flow_over_http() {
    let (router, pool) = setup().await;
    let (_a_id, a_token) = signup_and_login(&router, &pool, "a@example.com").await;

    let (_, body) = send(
        &router,
        post_json("/api/products", Some(&a_token), json!({ "name": "Checkout" })),
    )
    .await;
    let parent_id = body["data"]["id"].as_str().unwrap().to_string();

    // First child takes iteration number 1
    let (status, body) = send(
        &router,
        post_json(
            &format!("/api/products/{}/iterations", parent_id),
            Some(&a_token),
            json!({ "name": "Checkout v2" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["iteration_number"], 1);
    let child_id = body["data"]["id"].as_str().unwrap().to_string();

    // Second child takes 2
    let (_, body) = send(
        &router,
        post_json(
            &format!("/api/products/{}/iterations", parent_id),
            Some(&a_token),
            json!({ "name": "Checkout v3" }),
        ),
    )
    .await;
    assert_eq!(body["data"]["iteration_number"], 2);

    // The child's context includes the parent and its sibling
    let (status, body) = send(
        &router,
        get_authed(&format!("/api/products/{}/context", child_id), &a_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["parent"]["name"], "Checkout");
    assert_eq!(body["data"]["siblings"][0]["name"], "Checkout v3");

    // The parent is a root: empty context
    let (_, body) = send(
        &router,
        get_authed(&format!("/api/products/{}/context", parent_id), &a_token),
    )
    .await;
    assert!(body["data"]["parent"].is_null());
}

#[tokio::test]
async fn test_unknown_role_literal_is_bad_request() {
    let (router, pool) = setup().await;
    let (_a_id, a_token) = signup_and_login(&router, &pool, "a@example.com").await;
    let (b_id, _b_token) = signup_and_login(&router, &pool, "b@example.com").await;

    let (_, body) = send(
        &router,
        post_json("/api/products", Some(&a_token), json!({ "name": "Checkout" })),
    )
    .await;
    let product_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &router,
        post_json(
            &format!("/api/products/{}/access", product_id),
            Some(&a_token),
            json!({ "user_id": b_id, "role": "admin" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_document_generation_without_ai_key_is_bad_gateway() {
    let (router, pool) = setup().await;
    let (_a_id, a_token) = signup_and_login(&router, &pool, "a@example.com").await;

    let (_, body) = send(
        &router,
        post_json("/api/products", Some(&a_token), json!({ "name": "Checkout" })),
    )
    .await;
    let product_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &router,
        post_json(
            &format!("/api/products/{}/documents/research/generate", product_id),
            Some(&a_token),
            json!({ "user_input": "focus on mobile" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    // Nothing was written on failure
    let (_, body) = send(
        &router,
        get_authed(&format!("/api/products/{}", product_id), &a_token),
    )
    .await;
    assert!(body["data"]["research_document"].is_null());
    assert_eq!(body["data"]["research_status"], "not_started");
}
