//! Nurse account endpoints: signup, login, logout, dashboard.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use chrono::Utc;
use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, NurseContext};
use crate::db::repository;
use crate::models::Nurse;

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Pbkdf2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hash: {e}")))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── Signup ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub nurse_id: String,
    pub password: String,
}

/// `POST /api/signup` — register a nurse account.
pub async fn signup(
    State(ctx): State<ApiContext>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    }

    let conn = ctx.core.open_db()?;
    if repository::get_nurse_by_email(&conn, &email)?.is_some() {
        return Err(ApiError::EmailTaken);
    }

    let nurse = Nurse {
        id: Uuid::new_v4(),
        full_name: req.full_name.trim().to_string(),
        email,
        nurse_id: req.nurse_id.trim().to_string(),
        password_hash: hash_password(&req.password)?,
        created_at: Utc::now(),
    };
    repository::insert_nurse(&conn, &nurse)?;

    tracing::info!(nurse_id = %nurse.id, "Nurse account created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Signup successful",
        }),
    ))
}

// ── Login / logout ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub first_name: String,
}

/// `POST /api/login` — verify credentials and issue a bearer session token.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let nurse = repository::get_nurse_by_email(&conn, &req.email.trim().to_lowercase())?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &nurse.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let first_name = nurse.first_name().to_string();
    let token = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.issue(nurse.id, first_name.clone())
    };

    Ok(Json(LoginResponse { token, first_name }))
}

/// `POST /api/logout` — revoke the presented session token.
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(_nurse): Extension<NurseContext>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthorized)?;

    let revoked = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.revoke(token)
    };

    if revoked {
        Ok(Json(MessageResponse {
            message: "Logged out",
        }))
    } else {
        Err(ApiError::Unauthorized)
    }
}

// ── Dashboard ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct DashboardResponse {
    pub first_name: String,
    pub email: String,
}

/// `GET /api/dashboard` — greeting data for the logged-in nurse.
pub async fn dashboard(
    State(ctx): State<ApiContext>,
    Extension(nurse): Extension<NurseContext>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let nurse = repository::get_nurse(&conn, &nurse.nurse_id)?
        .ok_or_else(|| ApiError::NotFound("Nurse not found".into()))?;

    Ok(Json(DashboardResponse {
        first_name: nurse.first_name().to_string(),
        email: nurse.email,
    }))
}
