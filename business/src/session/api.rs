//! Authentication endpoints.

use crate::error::ApiResult;
use crate::model::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use crate::transport::{Transport, encode_error};

/// POST `/login`
pub async fn login(transport: &Transport, request: &LoginRequest) -> ApiResult<AuthResponse> {
    let builder = transport
        .post("/login")
        .json(request)
        .map_err(|e| encode_error(&e))?;
    transport.send_json(builder).await
}

/// POST `/register`
pub async fn register(
    transport: &Transport,
    request: &RegisterRequest,
) -> ApiResult<AuthResponse> {
    let builder = transport
        .post("/register")
        .json(request)
        .map_err(|e| encode_error(&e))?;
    transport.send_json(builder).await
}

/// POST `/forgot-password`
pub async fn forgot_password(
    transport: &Transport,
    request: &ForgotPasswordRequest,
) -> ApiResult<()> {
    let builder = transport
        .post("/forgot-password")
        .json(request)
        .map_err(|e| encode_error(&e))?;
    transport.send_ack(builder).await
}

/// POST `/reset-password`
pub async fn reset_password(
    transport: &Transport,
    request: &ResetPasswordRequest,
) -> ApiResult<()> {
    let builder = transport
        .post("/reset-password")
        .json(request)
        .map_err(|e| encode_error(&e))?;
    transport.send_ack(builder).await
}
