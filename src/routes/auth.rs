use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{
    generate_dummy_argon2_hash, hash_token, sign_jwt_for_user, verify_password, AuthUser,
};
use crate::constants::{LOCKOUT_DURATION_MINUTES, MAX_FAILED_LOGIN_ATTEMPTS, MAX_SESSIONS_PER_USER};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::sessions::Session;
use crate::store::operations::users::{User, UserRole};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user record, without credentials or lockout state.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub points: u64,
    pub level: u32,
    pub streak: u32,
    pub badges: Vec<String>,
}

impl From<&User> for UserProfile {
    fn from(value: &User) -> Self {
        Self {
            id: value.id.clone(),
            email: value.email.clone(),
            name: value.name.clone(),
            role: value.role,
            tenant_id: value.tenant_id.clone(),
            position: value.position.clone(),
            points: value.points,
            level: value.level,
            streak: value.streak,
            badges: value.badges.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Sign an access token and persist its session, evicting the oldest
/// sessions beyond the per-user cap.
fn issue_token(user_id: &str, state: &AppState) -> Result<String, AppError> {
    if let Err(e) = state
        .store()
        .cleanup_oldest_user_sessions(user_id, MAX_SESSIONS_PER_USER)
    {
        tracing::warn!(user_id, error = %e, "清理多余会话失败");
    }

    let access_token = sign_jwt_for_user(
        user_id,
        &state.config().jwt_secret,
        state.config().jwt_expires_in_hours,
    )?;

    let token_hash = hash_token(&access_token);
    state.store().create_session(&Session {
        token_hash,
        user_id: user_id.to_string(),
        created_at: Utc::now(),
        expires_at: Utc::now() + Duration::hours(state.config().jwt_expires_in_hours as i64),
    })?;

    Ok(access_token)
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();
    let user = state.store().get_user_by_email(&email)?;

    // 用户不存在时仍执行一次哈希校验，保持响应时间一致
    let Some(mut user) = user else {
        let _ = verify_password(&req.password, &generate_dummy_argon2_hash());
        return Err(AppError::unauthorized("Invalid email or password"));
    };

    if !user.is_active {
        return Err(AppError::forbidden("Account is deactivated"));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::too_many_requests(
                "Account temporarily locked due to too many failed login attempts. Please try again later.",
            ));
        }
    }

    if !verify_password(&req.password, &user.password_hash)? {
        // 记录登录失败，达到阈值后锁定账户
        user.failed_login_count += 1;
        if user.failed_login_count >= MAX_FAILED_LOGIN_ATTEMPTS {
            user.locked_until = Some(Utc::now() + Duration::minutes(LOCKOUT_DURATION_MINUTES));
            user.failed_login_count = 0;
            tracing::warn!(user_id = %user.id, "Account locked after repeated failed logins");
        }
        user.updated_at = Utc::now();
        let _ = state.store().update_user(&user);
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    // 登录成功，清除失败计数与锁定
    if user.failed_login_count > 0 || user.locked_until.is_some() {
        user.failed_login_count = 0;
        user.locked_until = None;
        user.updated_at = Utc::now();
        state.store().update_user(&user)?;
    }

    let access_token = issue_token(&user.id, &state)?;

    let payload = AuthResponse {
        access_token: access_token.clone(),
        user: UserProfile::from(&user),
    };

    let mut response = ok(payload).into_response();
    set_token_cookie(&mut response, &access_token)?;
    Ok(response)
}

async fn logout(auth: AuthUser, State(state): State<AppState>) -> Result<Response, AppError> {
    state.store().delete_user_sessions(&auth.user_id)?;

    let mut response = ok(serde_json::json!({"loggedOut": true})).into_response();
    append_set_cookie(
        &mut response,
        "token=; Path=/; Max-Age=0; SameSite=Strict; HttpOnly; Secure",
    )?;
    Ok(response)
}

async fn me(auth: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store()
        .get_user_by_id(&auth.user_id)?
        .ok_or_else(|| AppError::unauthorized("User not found"))?;
    Ok(ok(UserProfile::from(&user)))
}

fn set_token_cookie(response: &mut Response, token: &str) -> Result<(), AppError> {
    let cookie = format!("token={token}; Path=/; SameSite=Strict; HttpOnly; Secure");
    append_set_cookie(response, &cookie)
}

fn append_set_cookie(response: &mut Response, cookie: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::internal(&format!("set-cookie failed: {e}")))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}
