//! API handlers for the Web API.

pub mod auth;
pub mod pages;

pub use auth::*;
pub use pages::*;
