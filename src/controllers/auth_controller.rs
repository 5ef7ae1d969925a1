use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::ApiError,
    models::{CurrentUser, User},
    services::auth_service,
    AppState,
};

fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    re.is_match(email)
}

fn user_json(id_hex: String, email: &str, created_at: i64) -> serde_json::Value {
    let created = chrono::DateTime::from_timestamp(created_at, 0)
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| created_at.to_string());

    json!({ "id": id_hex, "email": email, "createdAt": created })
}

fn public_user(u: &User) -> serde_json::Value {
    user_json(u.id.to_hex(), &u.email, u.created_at)
}

#[derive(Deserialize)]
pub struct CredentialsBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn validate_credentials(body: &CredentialsBody) -> Result<(String, String), ApiError> {
    let email = body
        .email
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let password = body.password.clone().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("email/password required"));
    }

    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("invalid email"));
    }

    if password.len() < auth_service::MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request("password too short"));
    }

    if password.len() > auth_service::MAX_PASSWORD_LEN {
        return Err(ApiError::bad_request("password too long"));
    }

    Ok((email, password))
}

// POST /api/auth/register
pub async fn post_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = validate_credentials(&body)?;

    let user = auth_service::register_user(&state, &email, &password).await?;

    // registering logs the user straight in
    let token = auth_service::make_jwt_with_days(&state, &user.id, 7)?;
    let jar = jar.add(auth_service::auth_cookie(&state, token));

    Ok((jar, Json(json!({ "user": public_user(&user) }))))
}

// POST /api/auth/login
pub async fn post_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = validate_credentials(&body)?;

    let user = auth_service::login_user(&state, &email, &password).await?;

    let token = auth_service::make_jwt_with_days(&state, &user.id, 7)?;
    let jar = jar.add(auth_service::auth_cookie(&state, token));

    Ok((jar, Json(json!({ "user": public_user(&user) }))))
}

// POST /api/auth/logout
pub async fn post_logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(auth_service::clear_auth_cookie(&state));
    (jar, Json(json!({ "ok": true })))
}

// GET /api/auth/me
pub async fn get_me(user: Option<Extension<CurrentUser>>) -> Json<serde_json::Value> {
    match user {
        Some(Extension(u)) => Json(json!({
            "user": user_json(u.id.to_hex(), &u.email, u.created_at)
        })),
        None => Json(json!({ "user": null })),
    }
}
