//! Authentication core: credential verification, password hashing, the
//! reset-token flow, and the route gate.

mod credentials;
mod gate;
mod password;
mod reset;

pub use credentials::verify_credentials;
pub use gate::{
    allowed_prefixes, evaluate, RouteDecision, DEFAULT_PATH, LOGIN_PATH, PUBLIC_PATHS,
};
pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use reset::{consume_reset, generate_reset_token, request_reset};
