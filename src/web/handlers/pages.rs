//! Placeholder page handlers.
//!
//! The registration pages themselves are rendered by a separate frontend;
//! these handlers exist so the gated page paths resolve to something
//! observable. Each echoes the path the gate let through.

use axum::http::Uri;

/// Generic handler for gated page routes.
pub async fn page(uri: Uri) -> String {
    uri.path().to_string()
}
