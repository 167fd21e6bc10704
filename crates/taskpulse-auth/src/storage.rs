use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted session token material.
///
/// Only tokens live here. The user's password is never written to disk or
/// to any document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token for backend requests
    pub id_token: String,

    /// Optional refresh token for token renewal
    pub refresh_token: Option<String>,

    /// User the tokens belong to
    pub user_id: String,

    /// Token expiration timestamp (Unix timestamp)
    pub expires_at: i64,
}

impl TokenSet {
    /// Check if the token needs refresh (within 5 minutes of expiry)
    pub fn needs_refresh(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - 300 // 5 minute buffer
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at
    }
}

/// File-based token storage under the user's config directory.
pub struct TokenStorage {
    dir: PathBuf,
}

impl TokenStorage {
    /// Storage rooted at `{config_dir}/taskpulse/tokens`.
    pub fn new() -> Result<Self> {
        let dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("taskpulse")
            .join("tokens");
        Ok(Self { dir })
    }

    /// Storage rooted at an explicit directory (used by tests).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn token_path(&self, service: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).context("Failed to create tokens directory")?;
        Ok(self.dir.join(format!("{}.json", service)))
    }

    /// Store a token set.
    pub fn store(&self, service: &str, token_set: &TokenSet) -> Result<()> {
        let path = self.token_path(service)?;

        let json = serde_json::to_string_pretty(token_set)
            .context("Failed to serialize token set")?;

        fs::write(&path, &json).context("Failed to write token file")?;

        tracing::info!("Stored token for service: {} at {:?}", service, path);
        Ok(())
    }

    /// Retrieve a token set.
    pub fn retrieve(&self, service: &str) -> Result<TokenSet> {
        let path = self.token_path(service)?;

        let json = fs::read_to_string(&path).context("Failed to read token file")?;

        let token_set: TokenSet =
            serde_json::from_str(&json).context("Failed to deserialize token set")?;

        Ok(token_set)
    }

    /// Delete a token set. No-op if none is stored.
    pub fn delete(&self, service: &str) -> Result<()> {
        let path = self.token_path(service)?;

        if path.exists() {
            fs::remove_file(&path).context("Failed to delete token file")?;
            tracing::info!("Deleted token for service: {}", service);
        }

        Ok(())
    }

    /// Check if a token exists for a service.
    pub fn has(&self, service: &str) -> bool {
        self.retrieve(service).is_ok()
    }
}
