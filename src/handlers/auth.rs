use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::user::AuthSession;
use crate::errors::AppError;
use crate::state::AppState;
use crate::validation::{LoginRequest, RegisterRequest};

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Bearer token for the `Authorization` header.
    pub token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            id: session.user.id.to_string(),
            username: session.user.username,
            email: session.user.email,
            token: session.token,
        }
    }
}

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input or user already exists", body = super::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.validate()?;
    let auth = state.auth.clone();

    let session = web::block(move || auth.register(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Invalid input", body = super::ErrorResponse),
        (status = 401, description = "Invalid email or password", body = super::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.validate()?;
    let auth = state.auth.clone();

    let session = web::block(move || auth.login(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}
