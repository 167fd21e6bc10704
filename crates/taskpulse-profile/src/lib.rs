//! User records and profile documents.
//!
//! Two documents per user: `users/{user_id}` holds the account record
//! (username and email - never a password), `profile/{user_id}` holds the
//! editable profile (about, skills, image URL).

pub mod client;
pub mod error;
pub mod types;

pub use client::ProfileClient;
pub use error::ProfileError;
pub use types::{ProfileRecord, UserRecord};
