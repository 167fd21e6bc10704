use std::time::Duration;

use tracing::instrument;

use taskpulse_core::Session;

use crate::error::ProfileError;
use crate::types::{ProfileRecord, UserRecord};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ProfileClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProfileClient {
    pub fn new(base_url: &str) -> Result<Self, ProfileError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn user_url(&self, user_id: &str) -> String {
        format!("{}/v1/users/{}", self.base_url, urlencoding::encode(user_id))
    }

    fn profile_url(&self, user_id: &str) -> String {
        format!("{}/v1/profile/{}", self.base_url, urlencoding::encode(user_id))
    }

    /// Fetch the account record for a user.
    #[instrument(skip(self, session), level = "debug")]
    pub async fn get_user(&self, session: &Session, user_id: &str) -> Result<UserRecord, ProfileError> {
        let response = self
            .client
            .get(self.user_url(user_id))
            .bearer_auth(&session.id_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProfileError::NotFound(user_id.to_string()));
        }

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Write the account record (done once at signup, and when the
    /// display username changes).
    #[instrument(skip(self, session, record), level = "debug")]
    pub async fn put_user(
        &self,
        session: &Session,
        user_id: &str,
        record: &UserRecord,
    ) -> Result<(), ProfileError> {
        let response = self
            .client
            .put(self.user_url(user_id))
            .bearer_auth(&session.id_token)
            .json(record)
            .send()
            .await?;

        Self::check_status(response).await.map(|_| ())
    }

    /// Resolve a username to the email it was registered with, for
    /// username-based sign-in. Returns `None` when no account matches.
    #[instrument(skip(self), level = "debug")]
    pub async fn lookup_email(&self, username: &str) -> Result<Option<String>, ProfileError> {
        let url = format!(
            "{}/v1/users?username={}",
            self.base_url,
            urlencoding::encode(username)
        );

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;

        #[derive(serde::Deserialize)]
        struct LookupResponse {
            #[serde(default)]
            users: Vec<UserRecord>,
        }

        let body: LookupResponse = response.json().await?;
        Ok(body.users.into_iter().next().map(|u| u.email))
    }

    /// Fetch the editable profile. A user who never edited theirs has no
    /// document yet; that comes back as the default empty profile.
    #[instrument(skip(self, session), level = "debug")]
    pub async fn get_profile(
        &self,
        session: &Session,
        user_id: &str,
    ) -> Result<ProfileRecord, ProfileError> {
        let response = self
            .client
            .get(self.profile_url(user_id))
            .bearer_auth(&session.id_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(ProfileRecord::default());
        }

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Write the editable profile.
    #[instrument(skip(self, session, record), level = "debug")]
    pub async fn put_profile(
        &self,
        session: &Session,
        user_id: &str,
        record: &ProfileRecord,
    ) -> Result<(), ProfileError> {
        let response = self
            .client
            .put(self.profile_url(user_id))
            .bearer_auth(&session.id_token)
            .json(record)
            .send()
            .await?;

        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProfileError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!(%status, "Profile request failed: {}", message);
        Err(ProfileError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
