//! Response DTOs for the Web API.

use serde::Serialize;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token (JWT).
    pub token: String,
    /// Session expiry in seconds.
    pub expires_in: u64,
    /// Account information.
    pub account: AccountInfo,
}

/// Account information in responses.
#[derive(Debug, Serialize)]
pub struct AccountInfo {
    /// Account ID.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Authorization role.
    pub role: String,
    /// District.
    pub district: String,
    /// School ID (User-role accounts only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<i64>,
    /// School name (User-role accounts only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
}

/// Current session response.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Account ID.
    pub id: i64,
    /// Authorization role.
    pub role: String,
    /// District.
    pub district: String,
}
