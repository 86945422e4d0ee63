mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_server;
use common::auth::{auth_header, login_as, setup_admin_and_get_token};
use common::fixtures::seed_user;
use common::http::{assert_status_ok_json, request, response_json};

use lms_backend::store::operations::users::UserRole;

#[tokio::test]
async fn it_announcements_admin_creates_and_staff_reads() {
    let app = spawn_test_server().await;
    let (_admin, tenant_id, admin_token) = setup_admin_and_get_token(&app).await;

    let resp = request(
        &app.app,
        Method::POST,
        "/api/admin/announcements",
        Some(serde_json::json!({
            "tenantId": tenant_id,
            "title": "New menu training",
            "body": "Complete the autumn menu course by Friday.",
            "expiresInDays": 7,
        })),
        &[("authorization", auth_header(&admin_token))],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "New menu training");

    seed_user(
        app.state.store(),
        "reader@test.com",
        "Passw0rd!",
        &tenant_id,
        UserRole::Staff,
    );
    let staff_token = login_as(&app, "reader@test.com", "Passw0rd!").await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/announcements",
        None,
        &[("authorization", auth_header(&staff_token))],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    let items = body["data"].as_array().expect("announcements");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["tenantId"], tenant_id.as_str());
}

#[tokio::test]
async fn it_announcements_expired_are_hidden_from_staff() {
    let app = spawn_test_server().await;
    let (_admin, tenant_id, admin_token) = setup_admin_and_get_token(&app).await;

    let resp = request(
        &app.app,
        Method::POST,
        "/api/admin/announcements",
        Some(serde_json::json!({
            "tenantId": tenant_id,
            "title": "Yesterday's special",
            "body": "Already over.",
            "expiresInDays": -1,
        })),
        &[("authorization", auth_header(&admin_token))],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    seed_user(
        app.state.store(),
        "reader2@test.com",
        "Passw0rd!",
        &tenant_id,
        UserRole::Staff,
    );
    let staff_token = login_as(&app, "reader2@test.com", "Passw0rd!").await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/announcements",
        None,
        &[("authorization", auth_header(&staff_token))],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(0));

    // 管理端可按需包含已过期公告
    let resp = request(
        &app.app,
        Method::GET,
        &format!("/api/admin/announcements?tenantId={tenant_id}&includeExpired=true"),
        None,
        &[("authorization", auth_header(&admin_token))],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));
}
