use std::sync::Arc;
use std::time::Duration;

use chatci_chat::commands::CommandRouter;
use chatci_core::config::{AppConfig, ConfigError};
use chatci_core::{CredentialStore, InMemoryCredentialStore};
use chatci_jenkins::{JenkinsClient, JenkinsError};
use thiserror::Error;
use tracing::info;

use crate::service::JenkinsBridge;

pub struct Application {
    pub config: AppConfig,
    pub jenkins: JenkinsClient,
    pub command_router: Arc<CommandRouter<JenkinsBridge>>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("jenkins client setup failed: {0}")]
    Jenkins(#[from] JenkinsError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let jenkins = JenkinsClient::new(
        &config.jenkins.base_url,
        Duration::from_secs(config.jenkins.timeout_secs),
    )?;
    info!(
        event_name = "system.bootstrap.jenkins_client_ready",
        correlation_id = "bootstrap",
        jenkins_base_url = %jenkins.base_url(),
        timeout_secs = config.jenkins.timeout_secs,
        "jenkins client configured"
    );

    let credentials: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::default());
    let bridge = JenkinsBridge::new(credentials, Arc::new(jenkins.clone()));

    Ok(Application {
        config,
        jenkins,
        command_router: Arc::new(CommandRouter::new(bridge)),
    })
}
