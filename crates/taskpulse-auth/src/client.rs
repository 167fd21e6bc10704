//! REST client for the backend auth endpoints.
//!
//! Sign-in accepts either an email or a username. Username resolution is
//! supplied by the caller as an async lookup (the profile collaborator's
//! `lookup_email`), so the user's password goes to the auth endpoint and
//! nowhere else.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::instrument;

use taskpulse_core::Session;

use crate::error::AuthError;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Minimum password length enforced at sign-up (matches the backend rule).
pub const MIN_PASSWORD_LEN: usize = 6;

/// Returns true if the sign-in identifier should be treated as an email
/// rather than a username.
pub fn looks_like_email(identifier: &str) -> bool {
    identifier.contains('@')
}

/// Token material returned by the auth endpoints.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub user_id: String,
    pub id_token: String,
    pub refresh_token: Option<String>,
    pub expires_in_secs: i64,
}

impl AuthTokens {
    /// Build a [`Session`] for the signed-in user.
    pub fn into_session(self, email: &str) -> Session {
        Session::new(self.user_id, email, self.id_token)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AuthClient {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(ToString::to_string),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        match &self.api_key {
            Some(key) => format!("{}/v1/accounts:{}?key={}", self.base_url, action, key),
            None => format!("{}/v1/accounts:{}", self.base_url, action),
        }
    }

    /// Create a new account.
    ///
    /// Validates locally before hitting the network: username must be
    /// non-empty, the email must look like an email, and the password must
    /// be at least [`MIN_PASSWORD_LEN`] characters.
    #[instrument(skip(self, password), level = "info")]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<AuthTokens, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::validation("Username cannot be empty"));
        }
        if !looks_like_email(email) {
            return Err(AuthError::validation("Invalid email address"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        self.credential_request("signUp", email, password).await
    }

    /// Sign in with an email and password.
    ///
    /// Callers holding a username instead of an email use
    /// [`AuthClient::sign_in_with_identifier`].
    #[instrument(skip(self, password), level = "info")]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::validation("Email and password are required"));
        }

        self.credential_request("signInWithPassword", email, password)
            .await
    }

    /// Sign in with either an email or a username.
    ///
    /// Identifiers without an `@` are usernames and are resolved to the
    /// registered email first; `resolve_email` supplies that lookup
    /// (the profile collaborator's `lookup_email`, with its error adapted
    /// via [`AuthError::lookup`]). A username with no matching account
    /// fails with [`AuthError::UserNotFound`] before any credentials are
    /// sent anywhere.
    pub async fn sign_in_with_identifier<R, Fut>(
        &self,
        identifier: &str,
        password: &str,
        resolve_email: R,
    ) -> Result<AuthTokens, AuthError>
    where
        R: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Option<String>, AuthError>>,
    {
        if looks_like_email(identifier) {
            return self.sign_in(identifier, password).await;
        }

        let username = identifier.trim();
        if username.is_empty() {
            return Err(AuthError::validation("Username and password are required"));
        }

        match resolve_email(username.to_string()).await? {
            Some(email) => self.sign_in(&email, password).await,
            None => {
                tracing::info!(username, "Sign-in for unknown username");
                Err(AuthError::UserNotFound(username.to_string()))
            }
        }
    }

    async fn credential_request(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, AuthError> {
        let response = self
            .client
            .post(self.endpoint(action))
            .json(&CredentialRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Auth request failed: {}", body);
            return Err(Self::classify_failure(status.as_u16(), &body, email));
        }

        let body: TokenResponse = response.json().await?;
        let expires_in_secs = body
            .expires_in
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        Ok(AuthTokens {
            user_id: body.local_id,
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_in_secs,
        })
    }

    /// Map the backend's error codes onto our taxonomy. Unknown codes fall
    /// through to a generic API error carrying the status.
    fn classify_failure(status: u16, body: &str, email: &str) -> AuthError {
        let code = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_default();

        match code.as_str() {
            "EMAIL_EXISTS" => AuthError::EmailInUse,
            "EMAIL_NOT_FOUND" => AuthError::UserNotFound(email.to_string()),
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredentials,
            "WEAK_PASSWORD" => AuthError::validation("Password is too weak"),
            _ => AuthError::Api {
                status,
                message: if code.is_empty() { body.to_string() } else { code },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("alice@example.com"));
        assert!(!looks_like_email("alice"));
    }

    #[test]
    fn test_classify_known_codes() {
        let body = r#"{"error":{"message":"EMAIL_EXISTS"}}"#;
        assert!(matches!(
            AuthClient::classify_failure(400, body, "a@b.c"),
            AuthError::EmailInUse
        ));

        let body = r#"{"error":{"message":"INVALID_LOGIN_CREDENTIALS"}}"#;
        assert!(matches!(
            AuthClient::classify_failure(400, body, "a@b.c"),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn test_classify_unknown_code_keeps_status() {
        let body = r#"{"error":{"message":"QUOTA_EXCEEDED"}}"#;
        match AuthClient::classify_failure(429, body, "a@b.c") {
            AuthError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "QUOTA_EXCEEDED");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_up_rejects_short_password() {
        let client = AuthClient::new("http://localhost:1", None).unwrap();
        let result = client.sign_up("a@b.c", "short", "alice").await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_empty_username() {
        let client = AuthClient::new("http://localhost:1", None).unwrap();
        let result = client.sign_up("a@b.c", "longenough", "   ").await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_identifier_sign_in_unknown_username_never_sends_credentials() {
        // Port 1 is never listening; reaching the network would fail with
        // a Network error, not UserNotFound.
        let client = AuthClient::new("http://127.0.0.1:1", None).unwrap();
        let result = client
            .sign_in_with_identifier("ghost", "hunter22", |_| async {
                Ok::<Option<String>, AuthError>(None)
            })
            .await;
        assert!(matches!(result, Err(AuthError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_identifier_sign_in_email_skips_resolver() {
        let client = AuthClient::new("http://127.0.0.1:1", None).unwrap();
        // The resolver reports failure; an email identifier must never
        // consult it, so the error is the network one from sign_in.
        let result = client
            .sign_in_with_identifier("a@b.c", "hunter22", |_| async {
                Err::<Option<String>, AuthError>(AuthError::lookup("resolver down"))
            })
            .await;
        assert!(matches!(result, Err(AuthError::Network(_))));
    }

    #[tokio::test]
    async fn test_identifier_sign_in_propagates_lookup_failure() {
        let client = AuthClient::new("http://127.0.0.1:1", None).unwrap();
        let result = client
            .sign_in_with_identifier("alice", "hunter22", |_| async {
                Err::<Option<String>, AuthError>(AuthError::lookup("resolver down"))
            })
            .await;
        assert!(matches!(result, Err(AuthError::Lookup(_))));
    }
}
