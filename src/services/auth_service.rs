use axum_extra::extract::cookie::{Cookie, SameSite};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::{doc, oid::ObjectId};

use crate::{error::ApiError, models::User, AppState};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

#[derive(serde::Serialize)]
struct Claims {
    sub: String,
    exp: usize,
}

pub fn make_jwt_with_days(
    state: &AppState,
    user_id: &ObjectId,
    days: i64,
) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::days(days)).timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_hex(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.settings.jwt_secret.as_bytes()),
    )
    .map_err(ApiError::db)
}

pub fn auth_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(state.settings.jwt_cookie_name.clone(), token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if state.settings.cookie_secure {
        cookie.set_secure(true);
    }
    cookie
}

pub fn clear_auth_cookie(state: &AppState) -> Cookie<'static> {
    let mut cookie = Cookie::new(state.settings.jwt_cookie_name.clone(), "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.make_removal();
    cookie
}

/// Same message for unknown email and wrong password, so responses do not
/// reveal which accounts exist.
const INVALID_CREDENTIALS: &str = "invalid email or password";

pub async fn login_user(state: &AppState, email: &str, password: &str) -> Result<User, ApiError> {
    let users = state.db.collection::<User>("users");

    let user = users
        .find_one(doc! { "email": email }, None)
        .await
        .map_err(ApiError::db)?
        .ok_or(ApiError::Unauthorized(INVALID_CREDENTIALS))?;

    if !verify(password, &user.password_hash).unwrap_or(false) {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    }

    Ok(user)
}

pub async fn register_user(state: &AppState, email: &str, password: &str) -> Result<User, ApiError> {
    let users = state.db.collection::<User>("users");

    if users
        .find_one(doc! { "email": email }, None)
        .await
        .map_err(ApiError::db)?
        .is_some()
    {
        return Err(ApiError::Conflict("email already exists".to_string()));
    }

    let password_hash = hash(password, DEFAULT_COST).map_err(ApiError::db)?;

    let user = User {
        id: ObjectId::new(),
        email: email.to_string(),
        password_hash,
        created_at: Utc::now().timestamp(),
    };

    // The unique index on email closes the race between the duplicate check
    // and this insert; map the violation to the same 409.
    if let Err(e) = users.insert_one(&user, None).await {
        let msg = e.to_string();
        if msg.contains("E11000") {
            return Err(ApiError::Conflict("email already exists".to_string()));
        }
        return Err(ApiError::Db(msg));
    }

    Ok(user)
}
