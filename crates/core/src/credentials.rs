use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use crate::errors::ApplicationError;

#[derive(Clone)]
pub struct JenkinsCredentials {
    pub username: String,
    pub token: SecretString,
}

impl JenkinsCredentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self { username: username.into(), token: SecretString::from(token.into()) }
    }

    pub fn expose_token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl fmt::Debug for JenkinsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JenkinsCredentials")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Per chat-user storage of Jenkins credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn save(
        &self,
        user_id: &str,
        credentials: JenkinsCredentials,
    ) -> Result<(), ApplicationError>;

    async fn load(&self, user_id: &str) -> Result<Option<JenkinsCredentials>, ApplicationError>;

    /// Returns the removed credentials, if the user was connected.
    async fn remove(&self, user_id: &str) -> Result<Option<JenkinsCredentials>, ApplicationError>;
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    entries: RwLock<HashMap<String, JenkinsCredentials>>,
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn save(
        &self,
        user_id: &str,
        credentials: JenkinsCredentials,
    ) -> Result<(), ApplicationError> {
        self.entries.write().await.insert(user_id.to_owned(), credentials);
        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<Option<JenkinsCredentials>, ApplicationError> {
        Ok(self.entries.read().await.get(user_id).cloned())
    }

    async fn remove(&self, user_id: &str) -> Result<Option<JenkinsCredentials>, ApplicationError> {
        Ok(self.entries.write().await.remove(user_id))
    }
}
