mod common;

use axum::http::{Method, StatusCode};

use lms_backend::store::operations::users::UserRole;

use common::app::spawn_test_server;
use common::auth::{auth_header, login_as, setup_staff_and_get_token};
use common::fixtures::{seed_tenant, seed_user};
use common::http::{assert_json_error, assert_status_ok_json, request, response_json};

#[tokio::test]
async fn it_auth_login_success_returns_token_and_profile() {
    let app = spawn_test_server().await;
    let tenant = seed_tenant(app.state.store(), "Bistro Group");
    let user = seed_user(
        app.state.store(),
        "chef@test.com",
        "Passw0rd!",
        &tenant.id,
        UserRole::Staff,
    );

    let resp = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": "chef@test.com",
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;

    let (status, headers, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert!(body["data"]["accessToken"].as_str().is_some());
    assert_eq!(body["data"]["user"]["id"], user.id.as_str());
    assert_eq!(body["data"]["user"]["tenantId"], tenant.id.as_str());
    assert!(body["data"]["user"].get("passwordHash").is_none());

    // token 同时通过 Set-Cookie 下发
    let cookie = headers
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(cookie.starts_with("token="), "unexpected cookie: {cookie}");
}

#[tokio::test]
async fn it_auth_login_is_case_insensitive_on_email() {
    let app = spawn_test_server().await;
    let tenant = seed_tenant(app.state.store(), "Bistro Group");
    seed_user(
        app.state.store(),
        "case@test.com",
        "Passw0rd!",
        &tenant.id,
        UserRole::Staff,
    );

    let token = login_as(&app, "  CASE@Test.Com ", "Passw0rd!").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn it_auth_login_rejects_wrong_password() {
    let app = spawn_test_server().await;
    let tenant = seed_tenant(app.state.store(), "Bistro Group");
    seed_user(
        app.state.store(),
        "wrongpw@test.com",
        "Passw0rd!",
        &tenant.id,
        UserRole::Staff,
    );

    let resp = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": "wrongpw@test.com",
            "password": "not-the-password",
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_json_error(&body, "AUTH_UNAUTHORIZED");
}

#[tokio::test]
async fn it_auth_login_rejects_unknown_email_with_same_error() {
    let app = spawn_test_server().await;

    let resp = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": "nobody@test.com",
            "password": "whatever1A",
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_json_error(&body, "AUTH_UNAUTHORIZED");
}

#[tokio::test]
async fn it_auth_lockout_after_repeated_failures() {
    let app = spawn_test_server().await;
    let tenant = seed_tenant(app.state.store(), "Bistro Group");
    seed_user(
        app.state.store(),
        "lockout@test.com",
        "Passw0rd!",
        &tenant.id,
        UserRole::Staff,
    );

    for _ in 0..5 {
        let resp = request(
            &app.app,
            Method::POST,
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "lockout@test.com",
                "password": "bad-password",
            })),
            &[],
        )
        .await;
        let (status, _, _) = response_json(resp).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // 已锁定，正确密码也会被拒绝
    let resp = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": "lockout@test.com",
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_json_error(&body, "RATE_LIMITED");
}

#[tokio::test]
async fn it_auth_login_rejects_deactivated_user() {
    let app = spawn_test_server().await;
    let tenant = seed_tenant(app.state.store(), "Bistro Group");
    let mut user = seed_user(
        app.state.store(),
        "inactive@test.com",
        "Passw0rd!",
        &tenant.id,
        UserRole::Staff,
    );
    user.is_active = false;
    app.state.store().update_user(&user).expect("deactivate");

    let resp = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": "inactive@test.com",
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_json_error(&body, "FORBIDDEN");
}

#[tokio::test]
async fn it_auth_me_returns_profile() {
    let app = spawn_test_server().await;
    let (user, _tenant_id, token) = setup_staff_and_get_token(&app).await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/auth/me",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;

    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["id"], user.id.as_str());
    assert_eq!(body["data"]["email"], user.email.as_str());
}

#[tokio::test]
async fn it_auth_me_requires_token() {
    let app = spawn_test_server().await;

    let resp = request(&app.app, Method::GET, "/api/auth/me", None, &[]).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_json_error(&body, "AUTH_UNAUTHORIZED");
}

#[tokio::test]
async fn it_auth_logout_revokes_sessions() {
    let app = spawn_test_server().await;
    let (_user, _tenant_id, token) = setup_staff_and_get_token(&app).await;

    let resp = request(
        &app.app,
        Method::POST,
        "/api/auth/logout",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (status, _, _) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);

    let me = request(
        &app.app,
        Method::GET,
        "/api/auth/me",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    let (me_status, _, _) = response_json(me).await;
    assert_eq!(me_status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_auth_rejects_garbage_token() {
    let app = spawn_test_server().await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/auth/me",
        None,
        &[("authorization", "Bearer not-a-jwt".to_string())],
    )
    .await;
    let (status, _, _) = response_json(resp).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
