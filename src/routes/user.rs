use crate::{
    AppState,
    auth::{CurrentUser, create_token, expired_session_cookie, session_cookie},
    dto::{AuthResponse, LoginRequest, SignupRequest, UserResponse},
    errors::ApiError,
    urls,
};
use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use bcrypt::{DEFAULT_COST, hash, verify};
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

const LIMITER_SWEEP_THRESHOLD: usize = 10_000;

fn check_rate_limit(state: &AppState, username: &str) -> Result<(), ApiError> {
    let limiter = &state.auth_limiter;
    if limiter.len() > LIMITER_SWEEP_THRESHOLD {
        limiter.retain_recent();
    }

    limiter
        .check_key(&username.trim().to_lowercase())
        .map_err(|_| {
            warn!("Account endpoint rate limit hit for {}", username);
            ApiError::TooManyRequests
        })
}

/// POST /auth/signup
/// Body: { "email": "...", "username": "...", "password": "..." }
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    check_rate_limit(&state, &payload.username)?;
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let hashed_password = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = state
        .store
        .create_user(&payload.email, &payload.username, hashed_password)?;

    let token = create_token(
        &user.id,
        &user.username,
        &state.config.jwt.secret,
        state.config.jwt.expiry_hours,
    )?;

    info!("New user registered: {}", user.username);

    Ok((
        jar.add(session_cookie(token.clone())),
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// GET /auth/login
/// Where login-gated pages send anonymous visitors.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "detail": "POST username and password to this endpoint to log in",
        "next": query.next.unwrap_or_else(urls::index),
    }))
}

/// POST /auth/login
/// Body: { "username": "...", "password": "..." }
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    check_rate_limit(&state, &payload.username)?;
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let user = state
        .store
        .user_by_username(&payload.username)
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let valid = verify(&payload.password, &user.hashed_password)
        .map_err(|e| ApiError::InternalError(format!("Password verification failed: {}", e)))?;

    if !valid {
        warn!("Failed login for {}", user.username);
        return Err(ApiError::InvalidCredentials);
    }

    let token = create_token(
        &user.id,
        &user.username,
        &state.config.jwt.secret,
        state.config.jwt.expiry_hours,
    )?;

    info!("User logged in: {}", user.username);

    Ok((
        jar.add(session_cookie(token.clone())),
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// POST /auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(expired_session_cookie()), Redirect::to(&urls::index()))
}

/// GET /users/me
/// Headers: Authorization: Bearer <token>
pub async fn get_current_user(
    user: Option<CurrentUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let CurrentUser(user) = user.ok_or(ApiError::Unauthorized)?;
    Ok(Json(user.into()))
}
