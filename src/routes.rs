//! API route handlers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use regex::Regex;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth;
use crate::config::AppConfig;
use crate::scraper::{self, FixtureReport, PageClient};
use crate::storage::repository::User;
use crate::storage::UserRepository;
use crate::teams::{ProfileIndex, TableStanding};
use crate::types::{
    ErrorResponse, FavoriteRequest, FavoriteTeam, HealthResponse, LatestMatchQuery, LoginRequest,
    MessageResponse, RegisterRequest,
};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

/// Application state shared across handlers.
pub struct AppState {
    pub repo: Mutex<UserRepository>,
    pub client: PageClient,
    pub profiles: ProfileIndex,
    pub config: AppConfig,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.status.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Response that also sets or clears the session cookie.
type SessionResponse = (StatusCode, [(HeaderName, String); 1], Json<MessageResponse>);

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// League table endpoint. Scrape failures surface as an empty array.
pub async fn standings(State(state): State<Arc<AppState>>) -> Json<Vec<TableStanding>> {
    let table = scraper::fetch_standings(
        &state.client,
        &state.config.scraper.standings_url,
        &state.profiles,
    )
    .await;
    Json(table)
}

/// Recent results and next fixture for the team page named by `url`.
pub async fn latest_match(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LatestMatchQuery>,
) -> Result<Json<FixtureReport>, ApiError> {
    let url = query
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    let report = scraper::fetch_team_page(&state.client, url)
        .await
        .map_err(|e| {
            tracing::error!("team page scrape failed: {:#}", e);
            ApiError::internal("Error fetching match data")
        })?;

    Ok(Json(report))
}

/// Register a new account and open a session for it.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<SessionResponse, ApiError> {
    let username = req.username.trim();
    let email = req.email.trim();

    if username.len() < MIN_USERNAME_LEN {
        return Err(ApiError::bad_request(
            "Username must be at least 3 characters.",
        ));
    }
    if !valid_email(email) {
        return Err(ApiError::bad_request("A valid email address is required."));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters.",
        ));
    }

    let repo = state.repo.lock().await;

    if repo
        .find_user_by_username(username)
        .map_err(register_error)?
        .is_some()
    {
        return Err(ApiError::bad_request("Username already exists."));
    }
    if repo
        .find_user_by_email(email)
        .map_err(register_error)?
        .is_some()
    {
        return Err(ApiError::bad_request("Email already exists."));
    }

    let hash = auth::hash_password(&req.password, state.config.auth.bcrypt_cost)
        .map_err(register_error)?;
    let user_id = repo
        .create_user(username, email, &hash)
        .map_err(register_error)?;

    let cookie = open_session(&repo, user_id, &state.config).map_err(register_error)?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "User registered successfully!".to_string(),
        }),
    ))
}

/// Log in with username and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<SessionResponse, ApiError> {
    let repo = state.repo.lock().await;

    let user = repo
        .find_user_by_username(req.username.trim())
        .map_err(login_error)?
        .ok_or_else(|| ApiError::unauthorized("Username not found."))?;

    if !auth::verify_password(&req.password, &user.password_hash).map_err(login_error)? {
        return Err(ApiError::unauthorized("Incorrect password."));
    }

    // Expired sessions accumulate otherwise
    let _ = repo.delete_expired_sessions(Utc::now());

    let cookie = open_session(&repo, user.id, &state.config).map_err(login_error)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Login successful!".to_string(),
        }),
    ))
}

/// Log out, deleting the session named by the cookie.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<SessionResponse, ApiError> {
    if let Some(token) = auth::session_token(&headers) {
        let repo = state.repo.lock().await;
        repo.delete_session(&token).map_err(|e| {
            tracing::error!("logout failed: {:#}", e);
            ApiError::internal("Failed to log out")
        })?;
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

/// Favourite teams of the session user.
pub async fn get_favorites(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<FavoriteTeam>>, ApiError> {
    let user = current_user(&state, &headers).await?;

    let repo = state.repo.lock().await;
    let teams = repo
        .favorites_for_user(user.id)
        .map_err(favorites_error)?;

    Ok(Json(
        teams.into_iter().map(|team| FavoriteTeam { team }).collect(),
    ))
}

/// Add a favourite team for the session user.
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<FavoriteRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let team = req.team_name.trim();
    if team.is_empty() {
        return Err(ApiError::bad_request("Team name is required."));
    }

    let user = current_user(&state, &headers).await?;

    let repo = state.repo.lock().await;
    let inserted = repo.add_favorite(user.id, team).map_err(favorites_error)?;
    if !inserted {
        return Err(ApiError::conflict("Team is already a favourite."));
    }

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Favorite team added successfully!".to_string(),
        }),
    ))
}

/// Remove a favourite team for the session user.
pub async fn delete_favorite(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<FavoriteRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let team = req.team_name.trim();
    if team.is_empty() {
        return Err(ApiError::bad_request("Team name is required."));
    }

    let user = current_user(&state, &headers).await?;

    let repo = state.repo.lock().await;
    let removed = repo.remove_favorite(user.id, team).map_err(favorites_error)?;
    if !removed {
        return Err(ApiError::not_found("Favorite team not found."));
    }

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Favorite team removed successfully!".to_string(),
        }),
    ))
}

/// Resolve the request's session cookie to a user.
async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token =
        auth::session_token(headers).ok_or_else(|| ApiError::unauthorized("Not logged in."))?;

    let repo = state.repo.lock().await;
    repo.find_session(&token, Utc::now())
        .map_err(|e| {
            tracing::error!("session lookup failed: {:#}", e);
            ApiError::internal("Error fetching data")
        })?
        .ok_or_else(|| ApiError::unauthorized("Session expired or invalid."))
}

/// Create a session row and return the Set-Cookie value installing it.
fn open_session(
    repo: &UserRepository,
    user_id: i64,
    config: &AppConfig,
) -> anyhow::Result<String> {
    let token = auth::new_session_token();
    let ttl = config.auth.session_ttl_minutes;
    repo.create_session(&token, user_id, auth::session_expiry(ttl))?;
    Ok(auth::session_cookie(&token, ttl))
}

fn valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    re.is_match(email)
}

fn register_error(e: anyhow::Error) -> ApiError {
    tracing::error!("registration failed: {:#}", e);
    ApiError::internal("An error occurred while registering.")
}

fn login_error(e: anyhow::Error) -> ApiError {
    tracing::error!("login failed: {:#}", e);
    ApiError::internal("An error occurred during login.")
}

fn favorites_error(e: anyhow::Error) -> ApiError {
    tracing::error!("favourites query failed: {:#}", e);
    ApiError::internal("Error fetching data")
}
