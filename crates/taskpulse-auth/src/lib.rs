//! Email/password authentication against the backend auth collaborator.
//!
//! Credentials are sent to the auth endpoint only and are never persisted;
//! the session token set is stored locally via [`TokenStorage`].

pub mod client;
pub mod error;
pub mod storage;

pub use client::{looks_like_email, AuthClient, AuthTokens};
pub use error::AuthError;
pub use storage::{TokenSet, TokenStorage};
