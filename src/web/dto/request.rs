//! Request DTOs for the Web API.

use serde::Deserialize;
use validator::Validate;

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password reset request.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Account email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Password change request (reset token exchange).
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Reset token from the emailed link.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// New password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
