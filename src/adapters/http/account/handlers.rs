//! HTTP handlers for membership and account endpoints.

use axum::extract::{Json, Query, State};
use axum::response::IntoResponse;

use super::dto::{
    LoginRequest, LoginResponse, MembershipQuery, MembershipResponse, SetPasswordRequest, SetPasswordResponse,
};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{GetMembershipQuery, LoginCommand, SetPasswordCommand};
use crate::domain::foundation::EmailAddress;

/// GET /api/membership?email= - Membership stored for an email
pub async fn get_membership(
    State(state): State<AppState>,
    Query(query): Query<MembershipQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let raw = required_email(query.email.as_deref())?;
    let email = EmailAddress::parse(raw).map_err(|e| ApiError::bad_request("invalid_email", e.to_string()))?;

    let result = state
        .get_membership_handler()
        .handle(GetMembershipQuery { email })
        .await?;

    Ok(Json(MembershipResponse::from(result)))
}

/// POST /api/auth/login - Log in with email and, once set, password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = required_email(request.email.as_deref())?;

    let result = state
        .login_handler()
        .handle(LoginCommand {
            email: email.to_string(),
            password: request.password,
        })
        .await?;

    Ok(Json(LoginResponse::from(result)))
}

/// POST /api/auth/set-password - Redeem an activation token
pub async fn set_password(
    State(state): State<AppState>,
    Json(request): Json<SetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .set_password_handler()
        .handle(SetPasswordCommand {
            token: request.token.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
        })
        .await?;

    Ok(Json(SetPasswordResponse {
        ok: true,
        email: result.email.as_str().to_string(),
    }))
}

fn required_email(raw: Option<&str>) -> Result<&str, ApiError> {
    raw.map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| ApiError::bad_request("email_required", "Email is required"))
}
