//! Slash command service backed by a Jenkins server.
//!
//! Every operation resolves the caller's stored credentials first, then talks
//! to Jenkins. Failures never escape as transport errors; they are rendered as
//! chat replies carrying the request's correlation id.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chatci_chat::blocks::{self, MessageTemplate, ParameterHint};
use chatci_chat::commands::{BuildTarget, CommandEnvelope, CommandRouteError, JenkinsCommandService};
use chatci_core::{
    ApplicationError, BuildSelector, CredentialStore, InterfaceError, JenkinsCredentials, JobPath,
};
use chatci_jenkins::JenkinsApi;
use tracing::{info, warn};

pub struct JenkinsBridge {
    credentials: Arc<dyn CredentialStore>,
    jenkins: Arc<dyn JenkinsApi>,
}

impl JenkinsBridge {
    pub fn new(credentials: Arc<dyn CredentialStore>, jenkins: Arc<dyn JenkinsApi>) -> Self {
        Self { credentials, jenkins }
    }

    async fn credentials_for(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<JenkinsCredentials, ApplicationError> {
        self.credentials
            .load(&envelope.user_id)
            .await?
            .ok_or_else(|| ApplicationError::NotConnected { user_id: envelope.user_id.clone() })
    }

    async fn try_connect(
        &self,
        username: String,
        token: String,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = JenkinsCredentials::new(username, token);
        let user = self.jenkins.whoami(&credentials).await?;
        self.credentials.save(&envelope.user_id, credentials).await?;
        info!(
            event_name = "chat.account.connected",
            correlation_id = %envelope.request_id,
            user_id = %envelope.user_id,
            jenkins_user = %user.id,
            "jenkins account connected"
        );
        Ok(blocks::notice_message(
            "Your Jenkins account has been successfully connected.",
        ))
    }

    async fn try_disconnect(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let removed = self
            .credentials
            .remove(&envelope.user_id)
            .await?
            .ok_or_else(|| ApplicationError::NotConnected { user_id: envelope.user_id.clone() })?;
        Ok(blocks::notice_message(&format!("User '{}' has been disconnected.", removed.username)))
    }

    async fn try_build(
        &self,
        job_name: &str,
        parameters: &BTreeMap<String, String>,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = self.credentials_for(envelope).await?;
        let job = JobPath::parse(job_name)?;

        let definitions = self.jenkins.job_info(&credentials, &job).await?.parameter_definitions();
        if parameters.is_empty() && !definitions.is_empty() {
            let hints = definitions
                .iter()
                .map(|definition| ParameterHint {
                    name: definition.name.clone(),
                    default_value: definition.default_value(),
                    description: definition.description.clone(),
                })
                .collect::<Vec<_>>();
            return Ok(blocks::parameters_required_message(job_name, &hints, &envelope.trigger));
        }

        let queued = self.jenkins.trigger_build(&credentials, &job, parameters).await?;
        info!(
            event_name = "jenkins.build.queued",
            correlation_id = %envelope.request_id,
            job_name,
            parameter_count = parameters.len(),
            "build queued"
        );
        Ok(blocks::build_queued_message(job_name, queued.queue_url.as_deref()))
    }

    async fn try_abort(
        &self,
        target: &BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = self.credentials_for(envelope).await?;
        let job = JobPath::parse(&target.job_name)?;
        let build = BuildSelector::from_build_number(target.build_number.as_deref());
        self.jenkins.abort_build(&credentials, &job, &build).await?;

        let text = match &target.build_number {
            Some(number) => format!("Build #{number} of the job '{}' has been aborted.", target.job_name),
            None => format!("Last build of the job '{}' has been aborted.", target.job_name),
        };
        Ok(blocks::announcement_message(&text))
    }

    async fn try_set_enabled(
        &self,
        job_name: &str,
        enabled: bool,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = self.credentials_for(envelope).await?;
        let job = JobPath::parse(job_name)?;
        self.jenkins.set_job_enabled(&credentials, &job, enabled).await?;

        let state = if enabled { "enabled" } else { "disabled" };
        Ok(blocks::announcement_message(&format!("Job '{job_name}' has been {state}")))
    }

    async fn try_delete(
        &self,
        job_name: &str,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = self.credentials_for(envelope).await?;
        let job = JobPath::parse(job_name)?;
        self.jenkins.delete_job(&credentials, &job).await?;
        Ok(blocks::announcement_message(&format!("Job '{job_name}' has been deleted.")))
    }

    async fn try_artifacts(
        &self,
        target: &BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = self.credentials_for(envelope).await?;
        let job = JobPath::parse(&target.job_name)?;
        let build = BuildSelector::from_build_number(target.build_number.as_deref());

        let links = self
            .jenkins
            .artifacts(&credentials, &job, &build)
            .await?
            .into_iter()
            .map(|link| (link.file_name, link.url))
            .collect::<Vec<_>>();
        Ok(blocks::artifacts_message(&target.job_name, &target.label(), &links))
    }

    async fn try_test_results(
        &self,
        target: &BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = self.credentials_for(envelope).await?;
        let job = JobPath::parse(&target.job_name)?;
        let build = BuildSelector::from_build_number(target.build_number.as_deref());

        let results = self.jenkins.test_results(&credentials, &job, &build).await?;
        Ok(blocks::test_results_message(
            &target.job_name,
            &target.label(),
            results.report.pass_count,
            results.report.fail_count,
            results.report.skip_count,
            &results.url,
        ))
    }

    async fn try_console_log(
        &self,
        target: &BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = self.credentials_for(envelope).await?;
        let job = JobPath::parse(&target.job_name)?;
        let build = BuildSelector::from_build_number(target.build_number.as_deref());

        let log = self.jenkins.console_log(&credentials, &job, &build).await?;
        Ok(blocks::console_log_message(&target.job_name, &target.label(), &log))
    }

    async fn try_plugins(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = self.credentials_for(envelope).await?;
        let plugins = self
            .jenkins
            .plugins(&credentials)
            .await?
            .into_iter()
            .map(|plugin| (plugin.long_name.unwrap_or(plugin.short_name), plugin.version))
            .collect::<Vec<_>>();
        Ok(blocks::plugins_message(&plugins))
    }

    async fn try_safe_restart(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, ApplicationError> {
        let credentials = self.credentials_for(envelope).await?;
        self.jenkins.safe_restart(&credentials).await?;
        Ok(blocks::announcement_message("Safe restart of Jenkins server has been triggered."))
    }
}

/// Turns an operation outcome into a reply. `summary` is shown when Jenkins or
/// the credential store failed.
fn respond(
    envelope: &CommandEnvelope,
    summary: &str,
    outcome: Result<MessageTemplate, ApplicationError>,
) -> Result<MessageTemplate, CommandRouteError> {
    let error = match outcome {
        Ok(message) => return Ok(message),
        Err(error) => error,
    };

    let interface = error.into_interface(envelope.request_id.clone());
    warn!(
        event_name = "chat.command.failed",
        correlation_id = %envelope.request_id,
        user_id = %envelope.user_id,
        verb = %envelope.verb,
        error = %interface,
        "jenkins command failed"
    );

    let message = match &interface {
        InterfaceError::Unauthorized { .. } => blocks::notice_message(
            &interface.user_message().replace("/jenkins", &envelope.trigger),
        ),
        InterfaceError::BadRequest { message, .. } => {
            blocks::error_message(&format!("{summary} {message}"), interface.correlation_id())
        }
        InterfaceError::ServiceUnavailable { .. } | InterfaceError::Internal { .. } => {
            blocks::error_message(summary, interface.correlation_id())
        }
    };
    Ok(message)
}

#[async_trait]
impl JenkinsCommandService for JenkinsBridge {
    async fn connect(
        &self,
        username: String,
        token: String,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(
            envelope,
            "Error connecting to Jenkins.",
            self.try_connect(username, token, envelope).await,
        )
    }

    async fn disconnect(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(
            envelope,
            "Encountered an error while disconnecting the user from Jenkins.",
            self.try_disconnect(envelope).await,
        )
    }

    async fn me(&self, envelope: &CommandEnvelope) -> Result<MessageTemplate, CommandRouteError> {
        let outcome = self.credentials_for(envelope).await.map(|credentials| {
            blocks::notice_message(&format!(
                "You are connected to Jenkins as: {}",
                credentials.username
            ))
        });
        respond(envelope, "Encountered an error getting your Jenkins user information.", outcome)
    }

    async fn build(
        &self,
        job_name: String,
        parameters: BTreeMap<String, String>,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(
            envelope,
            &format!("Error triggering build for the job '{job_name}'."),
            self.try_build(&job_name, &parameters, envelope).await,
        )
    }

    async fn abort(
        &self,
        target: BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(
            envelope,
            "Encountered an error in aborting the build.",
            self.try_abort(&target, envelope).await,
        )
    }

    async fn set_job_enabled(
        &self,
        job_name: String,
        enabled: bool,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let summary = if enabled { "Error enabling the job." } else { "Error disabling the job." };
        respond(envelope, summary, self.try_set_enabled(&job_name, enabled, envelope).await)
    }

    async fn delete_job(
        &self,
        job_name: String,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(
            envelope,
            "Encountered an error while deleting the job.",
            self.try_delete(&job_name, envelope).await,
        )
    }

    async fn artifacts(
        &self,
        target: BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(envelope, "Error fetching artifacts.", self.try_artifacts(&target, envelope).await)
    }

    async fn test_results(
        &self,
        target: BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(
            envelope,
            "Error fetching test results.",
            self.try_test_results(&target, envelope).await,
        )
    }

    async fn console_log(
        &self,
        target: BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(
            envelope,
            "Encountered an error fetching logs.",
            self.try_console_log(&target, envelope).await,
        )
    }

    async fn plugins(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(
            envelope,
            "Encountered an error while fetching list of installed plugins.",
            self.try_plugins(envelope).await,
        )
    }

    async fn safe_restart(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        respond(
            envelope,
            "Encountered an error while safe restarting the Jenkins server.",
            self.try_safe_restart(envelope).await,
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chatci_chat::blocks::{Block, MessageTemplate, ResponseVisibility, TextObject};
    use chatci_chat::commands::{BuildTarget, CommandEnvelope, JenkinsCommandService};
    use chatci_core::{
        BuildSelector, CredentialStore, InMemoryCredentialStore, JenkinsCredentials, JobPath,
    };
    use chatci_jenkins::models::{
        ArtifactLink, DefaultParameterValue, JenkinsUser, JobInfo, JobProperty,
        ParameterDefinition, PluginInfo, QueuedBuild, TestReport, TestResults,
    };
    use chatci_jenkins::{JenkinsApi, JenkinsError, StatusCode};

    use super::JenkinsBridge;

    /// In-process Jenkins double that records every call it receives.
    #[derive(Default)]
    pub(crate) struct FakeJenkins {
        pub calls: Mutex<Vec<String>>,
        pub parameters: Vec<ParameterDefinition>,
        pub reject_credentials: bool,
    }

    impl FakeJenkins {
        fn record(&self, call: String) {
            self.calls.lock().expect("lock").push(call);
        }

        fn recorded(&self) -> Vec<String> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl JenkinsApi for FakeJenkins {
        async fn whoami(
            &self,
            credentials: &JenkinsCredentials,
        ) -> Result<JenkinsUser, JenkinsError> {
            self.record(format!("whoami:{}", credentials.username));
            if self.reject_credentials {
                return Err(JenkinsError::Unauthorized(StatusCode::UNAUTHORIZED));
            }
            Ok(JenkinsUser { id: credentials.username.clone(), full_name: None })
        }

        async fn job_info(
            &self,
            _credentials: &JenkinsCredentials,
            job: &JobPath,
        ) -> Result<JobInfo, JenkinsError> {
            self.record(format!("job_info:{job}"));
            Ok(JobInfo {
                property: vec![JobProperty { parameter_definitions: self.parameters.clone() }],
            })
        }

        async fn trigger_build(
            &self,
            _credentials: &JenkinsCredentials,
            job: &JobPath,
            parameters: &BTreeMap<String, String>,
        ) -> Result<QueuedBuild, JenkinsError> {
            let rendered =
                parameters.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(",");
            self.record(format!("trigger:{job}:{rendered}"));
            Ok(QueuedBuild { queue_url: Some("https://ci.example/queue/item/5/".to_owned()) })
        }

        async fn abort_build(
            &self,
            _credentials: &JenkinsCredentials,
            job: &JobPath,
            build: &BuildSelector,
        ) -> Result<(), JenkinsError> {
            self.record(format!("abort:{job}:{}", build.path_segment()));
            Ok(())
        }

        async fn set_job_enabled(
            &self,
            _credentials: &JenkinsCredentials,
            job: &JobPath,
            enabled: bool,
        ) -> Result<(), JenkinsError> {
            self.record(format!("enabled:{job}:{enabled}"));
            Ok(())
        }

        async fn delete_job(
            &self,
            _credentials: &JenkinsCredentials,
            job: &JobPath,
        ) -> Result<(), JenkinsError> {
            self.record(format!("delete:{job}"));
            Err(JenkinsError::NotFound(format!("/job/{job}")))
        }

        async fn artifacts(
            &self,
            _credentials: &JenkinsCredentials,
            job: &JobPath,
            build: &BuildSelector,
        ) -> Result<Vec<ArtifactLink>, JenkinsError> {
            self.record(format!("artifacts:{job}:{}", build.path_segment()));
            Ok(vec![ArtifactLink {
                file_name: "app.jar".to_owned(),
                url: "https://ci.example/job/app/3/artifact/app.jar".to_owned(),
            }])
        }

        async fn test_results(
            &self,
            _credentials: &JenkinsCredentials,
            job: &JobPath,
            build: &BuildSelector,
        ) -> Result<TestResults, JenkinsError> {
            self.record(format!("tests:{job}:{}", build.path_segment()));
            Ok(TestResults {
                report: TestReport { fail_count: 1, pass_count: 9, skip_count: 0 },
                url: "https://ci.example/job/app/lastBuild/testReport/".to_owned(),
            })
        }

        async fn console_log(
            &self,
            _credentials: &JenkinsCredentials,
            job: &JobPath,
            build: &BuildSelector,
        ) -> Result<String, JenkinsError> {
            self.record(format!("log:{job}:{}", build.path_segment()));
            Ok("Started by user alice\nFinished: SUCCESS".to_owned())
        }

        async fn plugins(
            &self,
            _credentials: &JenkinsCredentials,
        ) -> Result<Vec<PluginInfo>, JenkinsError> {
            self.record("plugins".to_owned());
            Ok(vec![PluginInfo {
                short_name: "git".to_owned(),
                long_name: Some("Git plugin".to_owned()),
                version: "5.2.1".to_owned(),
                active: true,
            }])
        }

        async fn safe_restart(&self, _credentials: &JenkinsCredentials) -> Result<(), JenkinsError> {
            self.record("safe-restart".to_owned());
            Ok(())
        }
    }

    pub(crate) fn envelope(verb: &str, user_id: &str) -> CommandEnvelope {
        CommandEnvelope {
            trigger: "/jenkins".to_owned(),
            verb: verb.to_owned(),
            args: Vec::new(),
            channel_id: "C1".to_owned(),
            user_id: user_id.to_owned(),
            trigger_id: String::new(),
            request_id: format!("req-{verb}"),
        }
    }

    fn text(message: &MessageTemplate) -> String {
        message
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Section { text: TextObject::Mrkdwn { text }, .. }
                | Block::Section { text: TextObject::Plain { text }, .. } => Some(text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn connected_bridge(jenkins: FakeJenkins) -> (JenkinsBridge, Arc<FakeJenkins>) {
        let store = Arc::new(InMemoryCredentialStore::default());
        store.save("U1", JenkinsCredentials::new("alice", "token")).await.expect("save");
        let jenkins = Arc::new(jenkins);
        (JenkinsBridge::new(store, jenkins.clone()), jenkins)
    }

    #[tokio::test]
    async fn unconnected_users_are_told_to_connect() {
        let (bridge, jenkins) = connected_bridge(FakeJenkins::default()).await;

        let message = bridge.plugins(&envelope("plugins", "U2")).await.expect("reply");

        assert!(text(&message).contains("/jenkins connect username APIToken"));
        assert_eq!(message.visibility, ResponseVisibility::Ephemeral);
        assert!(jenkins.recorded().is_empty());
    }

    #[tokio::test]
    async fn connect_validates_before_storing() {
        let store = Arc::new(InMemoryCredentialStore::default());
        let jenkins = Arc::new(FakeJenkins { reject_credentials: true, ..FakeJenkins::default() });
        let bridge = JenkinsBridge::new(store.clone(), jenkins.clone());

        let message = bridge
            .connect("alice".to_owned(), "bad".to_owned(), &envelope("connect", "U1"))
            .await
            .expect("reply");

        assert!(message.fallback_text.contains("Error connecting to Jenkins."));
        assert!(store.load("U1").await.expect("load").is_none());

        let accepting = Arc::new(FakeJenkins::default());
        let bridge = JenkinsBridge::new(store.clone(), accepting);
        let message = bridge
            .connect("alice".to_owned(), "good".to_owned(), &envelope("connect", "U1"))
            .await
            .expect("reply");

        assert!(text(&message).contains("successfully connected"));
        let stored = store.load("U1").await.expect("load").expect("stored");
        assert_eq!(stored.expose_token(), "good");
    }

    #[tokio::test]
    async fn me_and_disconnect_use_stored_account() {
        let (bridge, _) = connected_bridge(FakeJenkins::default()).await;

        let me = bridge.me(&envelope("me", "U1")).await.expect("reply");
        assert_eq!(text(&me), "You are connected to Jenkins as: alice");

        let gone = bridge.disconnect(&envelope("disconnect", "U1")).await.expect("reply");
        assert_eq!(text(&gone), "User 'alice' has been disconnected.");

        let again = bridge.disconnect(&envelope("disconnect", "U1")).await.expect("reply");
        assert!(text(&again).contains("connect"));
    }

    #[tokio::test]
    async fn parameterized_build_without_values_lists_parameters() {
        let jenkins = FakeJenkins {
            parameters: vec![ParameterDefinition {
                name: "BRANCH".to_owned(),
                kind: Some("StringParameterDefinition".to_owned()),
                description: None,
                default_parameter_value: Some(DefaultParameterValue {
                    value: Some(serde_json::Value::String("main".to_owned())),
                }),
            }],
            ..FakeJenkins::default()
        };
        let (bridge, jenkins) = connected_bridge(jenkins).await;

        let message = bridge
            .build("folder/app".to_owned(), BTreeMap::new(), &envelope("build", "U1"))
            .await
            .expect("reply");

        assert!(text(&message).contains("`BRANCH` (default `main`)"));
        assert_eq!(jenkins.recorded(), vec!["job_info:folder/app"]);
    }

    #[tokio::test]
    async fn build_with_parameters_is_queued_in_channel() {
        let (bridge, jenkins) = connected_bridge(FakeJenkins::default()).await;
        let mut parameters = BTreeMap::new();
        parameters.insert("BRANCH".to_owned(), "release".to_owned());

        let message =
            bridge.build("app".to_owned(), parameters, &envelope("build", "U1")).await.expect("reply");

        assert_eq!(message.visibility, ResponseVisibility::InChannel);
        assert_eq!(jenkins.recorded(), vec!["job_info:app", "trigger:app:BRANCH=release"]);
    }

    #[tokio::test]
    async fn build_targets_address_last_or_numbered_builds() {
        let (bridge, jenkins) = connected_bridge(FakeJenkins::default()).await;

        let aborted = bridge
            .abort(
                BuildTarget { job_name: "app".to_owned(), build_number: None },
                &envelope("abort", "U1"),
            )
            .await
            .expect("reply");
        assert_eq!(text(&aborted), "Last build of the job 'app' has been aborted.");

        let log = bridge
            .console_log(
                BuildTarget { job_name: "app".to_owned(), build_number: Some("+12".to_owned()) },
                &envelope("get-log", "U1"),
            )
            .await
            .expect("reply");
        assert!(text(&log).contains("Finished: SUCCESS"));

        let tests = bridge
            .test_results(
                BuildTarget { job_name: "app".to_owned(), build_number: None },
                &envelope("test-results", "U1"),
            )
            .await
            .expect("reply");
        assert!(text(&tests).contains("passed: 9, failed: 1, skipped: 0"));

        assert_eq!(
            jenkins.recorded(),
            vec!["abort:app:lastBuild", "log:app:12", "tests:app:lastBuild"]
        );
    }

    #[tokio::test]
    async fn jenkins_failures_render_error_with_correlation_id() {
        let (bridge, _) = connected_bridge(FakeJenkins::default()).await;

        let message =
            bridge.delete_job("app".to_owned(), &envelope("delete", "U1")).await.expect("reply");

        assert_eq!(message.fallback_text, "Encountered an error while deleting the job.");
        assert!(matches!(
            message.blocks.last(),
            Some(Block::Context { elements, .. })
                if matches!(elements.first(), Some(TextObject::Plain { text }) if text.contains("req-delete"))
        ));
    }

    #[tokio::test]
    async fn malformed_job_paths_are_reported_without_calling_jenkins() {
        let (bridge, jenkins) = connected_bridge(FakeJenkins::default()).await;

        let message = bridge
            .set_job_enabled("team//app".to_owned(), false, &envelope("disable", "U1"))
            .await
            .expect("reply");

        assert!(message.fallback_text.starts_with("Error disabling the job."));
        assert!(message.fallback_text.contains("folder segments must not be empty"));
        assert!(jenkins.recorded().is_empty());
    }

    #[tokio::test]
    async fn plugins_prefer_display_names() {
        let (bridge, _) = connected_bridge(FakeJenkins::default()).await;
        let message = bridge.plugins(&envelope("plugins", "U1")).await.expect("reply");
        assert!(text(&message).contains("Git plugin `5.2.1`"));
    }
}
