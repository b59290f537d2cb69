//! Authentication module
//!
//! Supports: scoped token, Bearer, Basic, Identity v3 password
//!
//! The `Authenticator` applies credentials to outgoing requests and caches
//! the token issued by the identity service for password auth.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, AUTH_TOKEN_HEADER, SUBJECT_TOKEN_HEADER};
pub use types::{AuthConfig, CachedToken};
