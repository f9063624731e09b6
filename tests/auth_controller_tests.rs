mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{TestApp, request};
use digital_lurker::repositories::UserRepository;

async fn register(app: &TestApp, username: &str, password: &str) {
    let (status, body) = app
        .send(request("POST", "/users/").json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": password,
            "date_of_birth": "1990-04-01"
        })))
        .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
}

async fn obtain(app: &TestApp, username: &str, password: &str) -> (StatusCode, Value) {
    app.send(request("POST", "/auth/token/").json(json!({
        "username": username,
        "password": password
    })))
    .await
}

#[tokio::test]
async fn obtained_access_token_authenticates_requests() {
    let app = TestApp::new();
    register(&app, "lurker", "Quiet-Steps-42").await;

    let (status, tokens) = obtain(&app, "lurker", "Quiet-Steps-42").await;
    assert_eq!(status, StatusCode::OK);
    let access = tokens["access"].as_str().unwrap();
    assert!(tokens["refresh"].is_string());

    let (status, body) = app
        .send(request("GET", "/users/me/").token(access).empty())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "lurker");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_or_inactive_account_is_rejected() {
    let app = TestApp::new();
    register(&app, "lurker", "Quiet-Steps-42").await;
    let expected = json!({ "detail": "No active account found with the given credentials" });

    let (status, body) = obtain(&app, "lurker", "Loud-Steps-42").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    let (status, body) = obtain(&app, "nobody", "Quiet-Steps-42").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    let mut user = app
        .store
        .get_by_username("lurker")
        .await
        .unwrap()
        .unwrap();
    user.is_active = false;
    UserRepository::update(&app.store, &user).await.unwrap();

    let (status, body) = obtain(&app, "lurker", "Quiet-Steps-42").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn obtain_reports_missing_fields() {
    let app = TestApp::new();

    let (status, body) = app
        .send(request("POST", "/auth/token/").json(json!({})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["username"], json!(["This field is required."]));
    assert_eq!(body["password"], json!(["This field is required."]));
}

#[tokio::test]
async fn refresh_issues_a_new_access_token() {
    let app = TestApp::new();
    register(&app, "lurker", "Quiet-Steps-42").await;
    let (_, tokens) = obtain(&app, "lurker", "Quiet-Steps-42").await;

    let (status, body) = app
        .send(request("POST", "/auth/token/refresh/").json(json!({
            "refresh": tokens["refresh"]
        })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["access"].as_str().unwrap();

    let (status, _) = app
        .send(request("GET", "/users/me/").token(access).empty())
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_rejects_access_tokens_and_garbage() {
    let app = TestApp::new();
    let user = app.create_user("lurker", false).await;
    let expected = json!({ "detail": "Token is invalid or expired", "code": "token_not_valid" });

    let (status, body) = app
        .send(request("POST", "/auth/token/refresh/").json(json!({
            "refresh": app.token_for(&user)
        })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    let (status, body) = app
        .send(request("POST", "/auth/token/refresh/").json(json!({ "refresh": "abc.def.ghi" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn malformed_bearer_token_is_unauthorized() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    let place = app.create_place(&admin, "Harbour", (18.65, 54.35), 25, true).await;

    let (status, body) = app
        .send(
            request("GET", &format!("/places/{}/", place.public_id))
                .token("not-a-jwt")
                .empty(),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_not_valid");
}

#[tokio::test]
async fn unauthenticated_me_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app.send(request("GET", "/users/me/").empty()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "detail": "Authentication credentials were not provided." })
    );
}

#[tokio::test]
async fn configured_admin_is_seeded_once_and_can_log_in() {
    let app = TestApp::with(|config| {
        config.set("admin.username", "root");
        config.set("admin.email", "root@example.com");
        config.set("admin.password", "Seeded-Admin-9");
    });

    app.state.seed_admin().await.unwrap();
    app.state.seed_admin().await.unwrap();

    let admin = app.store.get_by_username("root").await.unwrap().unwrap();
    assert!(admin.is_staff);

    let (status, tokens) = obtain(&app, "root", "Seeded-Admin-9").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            request("GET", "/places/search/")
                .token(tokens["access"].as_str().unwrap())
                .empty(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
