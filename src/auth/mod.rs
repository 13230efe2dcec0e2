//! Authentication module
//!
//! Supports: none, a fixed bearer token, and admin session login.
//!
//! The `Authenticator` caches the session token after the first login.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;

#[cfg(test)]
mod tests;
