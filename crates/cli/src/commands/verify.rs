use std::env;
use std::time::Duration;

use chatci_core::config::{AppConfig, LoadOptions};
use chatci_core::JenkinsCredentials;
use chatci_jenkins::{JenkinsApi, JenkinsClient, JenkinsError};
use serde_json::json;

use crate::commands::CommandResult;

/// Environment variable holding the API token to verify.
pub const TOKEN_ENV: &str = "JENKINS_API_TOKEN";

/// Checks that `username` plus the token in [`TOKEN_ENV`] are accepted by the
/// configured Jenkins server, the same check `connect` performs.
pub fn run(username: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "verify",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let Some(token) = env::var(TOKEN_ENV).ok().filter(|token| !token.trim().is_empty()) else {
        return CommandResult::failure(
            "verify",
            "missing_token",
            format!("set {TOKEN_ENV} to the Jenkins API token of `{username}`"),
            2,
        );
    };

    let client = match JenkinsClient::new(
        &config.jenkins.base_url,
        Duration::from_secs(config.jenkins.timeout_secs),
    ) {
        Ok(client) => client,
        Err(error) => return CommandResult::failure("verify", "jenkins_client", error.to_string(), 4),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "verify",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let credentials = JenkinsCredentials::new(username, token);
    match runtime.block_on(client.whoami(&credentials)) {
        Ok(user) => CommandResult::success_with(
            "verify",
            format!("credentials accepted by {}", client.base_url()),
            Some(json!({ "id": user.id, "full_name": user.full_name })),
        ),
        Err(error @ JenkinsError::Unauthorized(_)) => {
            CommandResult::failure("verify", "unauthorized", error.to_string(), 5)
        }
        Err(error) => CommandResult::failure("verify", "jenkins_request", error.to_string(), 4),
    }
}
