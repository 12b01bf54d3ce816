use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn register_login_me_round_trip() {
    let app = TestApp::spawn().await;

    let body = json!({
        "username": "alice",
        "password": "pass12345",
        "nickname": "Alice",
        "email": "alice@example.com",
    });
    let reg = app.post_without_token(routes::REGISTER, &body).await;
    assert_eq!(reg.status, 201);
    assert_eq!(reg.body["username"], "alice");

    let login = app.post_without_token(routes::LOGIN, &body).await;
    assert_eq!(login.status, 200);
    assert_eq!(login.body["nickname"], "Alice");
    let token = login.body["token"].as_str().unwrap();

    let me = app.get_with_token(routes::ME, token).await;
    assert_eq!(me.status, 200);
    assert_eq!(me.body["username"], "alice");
    assert_eq!(me.body["email"], "alice@example.com");
}

#[tokio::test]
async fn duplicate_usernames_are_rejected() {
    let app = TestApp::spawn().await;
    let body = json!({ "username": "alice", "password": "pass12345" });

    assert_eq!(app.post_without_token(routes::REGISTER, &body).await.status, 201);

    let dup = app.post_without_token(routes::REGISTER, &body).await;
    assert_eq!(dup.status, 409);
    assert_eq!(dup.body["code"], "USERNAME_TAKEN");
}

#[tokio::test]
async fn short_passwords_fail_validation() {
    let app = TestApp::spawn().await;
    let body = json!({ "username": "alice", "password": "short" });

    let res = app.post_without_token(routes::REGISTER, &body).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::spawn().await;
    app.create_authenticated_user("alice").await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({ "username": "alice", "password": "wrong-pass" }),
        )
        .await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::ME).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");

    let res = app.get_with_token(routes::ME, "not-a-token").await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}
