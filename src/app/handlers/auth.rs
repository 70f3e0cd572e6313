use crate::app::extract::{AuthUser, JsonBody};
use crate::app::AppState;
use crate::core::auth::{hash_password, verify_password};
use crate::domain::model::{PublicUser, User, DEFAULT_PLAN};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{is_valid_email, is_valid_password, non_blank};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// Argon2 很耗 CPU，移出 async worker
async fn hash_off_thread(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::PasswordHashError {
            message: e.to_string(),
        })?
}

async fn verify_off_thread(password: String, password_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AppError::PasswordHashError {
            message: e.to_string(),
        })
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterBody>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let (Some(name), Some(email), Some(password)) = (
        non_blank(body.name),
        non_blank(body.email),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("Please provide all required fields"));
    };

    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Please provide a valid email"));
    }
    if !is_valid_password(&password) {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }

    if state.users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::validation("User already exists with this email"));
    }

    let now = Utc::now();
    let user = state
        .users
        .insert_user(User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash: hash_off_thread(password).await?,
            plan: DEFAULT_PLAN.to_string(),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!("👤 Registered user {}", user.id);
    let token = state.tokens.issue(user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: PublicUser::from(&user),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<AuthResponse>> {
    let (Some(email), Some(password)) =
        (non_blank(body.email), body.password.filter(|p| !p.is_empty()))
    else {
        return Err(AppError::validation("Please provide email and password"));
    };

    let user = state
        .users
        .find_user_by_email(&normalize_email(&email))
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !verify_off_thread(password, user.password_hash.clone()).await? {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = state.tokens.issue(user.id)?;
    Ok(Json(AuthResponse {
        user: PublicUser::from(&user),
        token,
    }))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: PublicUser::from(&user),
    })
}
