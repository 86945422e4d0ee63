use axum::http::Method;

use lms_backend::store::operations::users::{User, UserRole};

use super::app::TestApp;
use super::fixtures::{seed_tenant, seed_user};
use super::http::{request, response_json};

pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// 播种用户后走真实登录流程拿 access token
pub async fn login_as(app: &TestApp, email: &str, password: &str) -> String {
    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": email,
            "password": password,
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(response).await;
    assert!(status.is_success(), "login failed: {body}");

    body["data"]["accessToken"]
        .as_str()
        .expect("access token in login response")
        .to_string()
}

/// Seeds a tenant plus a staff user and logs them in.
/// Returns (user, tenant_id, token).
pub async fn setup_staff_and_get_token(app: &TestApp) -> (User, String, String) {
    let tenant = seed_tenant(app.state.store(), "Test Restaurant Group");
    let email = format!("staff-{}@test.com", uuid::Uuid::new_v4());
    let password = "Passw0rd!";

    let user = seed_user(app.state.store(), &email, password, &tenant.id, UserRole::Staff);
    let token = login_as(app, &email, password).await;

    (user, tenant.id, token)
}

pub async fn setup_admin_and_get_token(app: &TestApp) -> (User, String, String) {
    let tenant = seed_tenant(app.state.store(), "Test Restaurant Group");
    let email = format!("admin-{}@test.com", uuid::Uuid::new_v4());
    let password = "AdminPassw0rd!";

    let user = seed_user(app.state.store(), &email, password, &tenant.id, UserRole::Admin);
    let token = login_as(app, &email, password).await;

    (user, tenant.id, token)
}
