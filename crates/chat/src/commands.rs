use std::collections::BTreeMap;

use async_trait::async_trait;
use chatci_core::args::{self, ParsedArgs};
use thiserror::Error;
use tracing::debug;

use crate::blocks::{self, MessageTemplate};

const JOB_NOT_SPECIFIED: &str = "Please specify a job name to build.";
const JOB_OR_BUILD_NOT_SPECIFIED: &str = "Please specify a job name or jobname and build number.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashCommandPayload {
    pub command: String,
    pub text: String,
    pub channel_id: String,
    pub user_id: String,
    pub trigger_id: String,
    pub request_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandEnvelope {
    pub trigger: String,
    pub verb: String,
    pub args: Vec<String>,
    pub channel_id: String,
    pub user_id: String,
    pub trigger_id: String,
    pub request_id: String,
}

/// A job plus an optional build number; a missing number means the last build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildTarget {
    pub job_name: String,
    pub build_number: Option<String>,
}

impl BuildTarget {
    pub fn label(&self) -> String {
        match &self.build_number {
            Some(number) => format!("build #{number}"),
            None => "the last build".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JenkinsCommand {
    Connect { username: String, token: String },
    Disconnect,
    Me,
    Build { job_name: String, parameters: BTreeMap<String, String> },
    Abort { target: BuildTarget },
    Enable { job_name: String },
    Disable { job_name: String },
    Delete { job_name: String },
    GetArtifacts { target: BuildTarget },
    TestResults { target: BuildTarget },
    GetLog { target: BuildTarget },
    Plugins,
    SafeRestart,
    Help,
    /// Recognized verb with arguments that do not fit it.
    Usage { message: String },
    Unknown { verb: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unsupported slash command: {0}")]
    UnsupportedCommand(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandRouteError {
    #[error("command service failed: {0}")]
    Service(String),
}

/// Builds an envelope from a slash command. `trigger` is the configured
/// command word, e.g. `/jenkins`. Text that repeats the trigger (as some
/// platforms send the full command line) is accepted too.
pub fn normalize_command(
    payload: SlashCommandPayload,
    trigger: &str,
) -> Result<CommandEnvelope, CommandParseError> {
    if payload.command.trim() != trigger {
        return Err(CommandParseError::UnsupportedCommand(payload.command));
    }

    let mut tokens = args::split_tokens(&payload.text);
    if tokens.first() == Some(&trigger) {
        tokens.remove(0);
    }
    let verb = tokens.first().map(|verb| (*verb).to_owned()).unwrap_or_default();
    let args = tokens.iter().skip(1).map(|token| (*token).to_owned()).collect();

    Ok(CommandEnvelope {
        trigger: trigger.to_owned(),
        verb,
        args,
        channel_id: payload.channel_id,
        user_id: payload.user_id,
        trigger_id: payload.trigger_id,
        request_id: payload.request_id,
    })
}

pub fn classify_command<S: AsRef<str>>(verb: &str, tokens: &[S]) -> JenkinsCommand {
    match verb {
        "connect" => match tokens {
            [username, token] => JenkinsCommand::Connect {
                username: username.as_ref().to_owned(),
                token: token.as_ref().to_owned(),
            },
            _ => usage("Please specify both username and API token."),
        },
        "disconnect" => JenkinsCommand::Disconnect,
        "me" => JenkinsCommand::Me,
        "build" => match parse_job_args(verb, tokens) {
            Some(parsed) => {
                JenkinsCommand::Build { job_name: parsed.job_name, parameters: parsed.parameters }
            }
            None => usage(JOB_NOT_SPECIFIED),
        },
        "abort" => match parse_job_args(verb, tokens) {
            Some(parsed) => JenkinsCommand::Abort { target: build_target(parsed) },
            None => usage(JOB_OR_BUILD_NOT_SPECIFIED),
        },
        "enable" => match job_only(verb, tokens, "Please specify a job to enable.", "enable a job") {
            Ok(job_name) => JenkinsCommand::Enable { job_name },
            Err(command) => command,
        },
        "disable" => {
            match job_only(verb, tokens, "Please specify a job to disable.", "disable a job") {
                Ok(job_name) => JenkinsCommand::Disable { job_name },
                Err(command) => command,
            }
        }
        "delete" => match job_only(verb, tokens, JOB_OR_BUILD_NOT_SPECIFIED, "delete a job") {
            Ok(job_name) => JenkinsCommand::Delete { job_name },
            Err(command) => command,
        },
        "get-artifacts" => match parse_job_args(verb, tokens) {
            Some(parsed) => JenkinsCommand::GetArtifacts { target: build_target(parsed) },
            None => usage(JOB_NOT_SPECIFIED),
        },
        "test-results" => match parse_job_args(verb, tokens) {
            Some(parsed) => JenkinsCommand::TestResults { target: build_target(parsed) },
            None => usage(JOB_NOT_SPECIFIED),
        },
        "get-log" => match parse_job_args(verb, tokens) {
            Some(parsed) => JenkinsCommand::GetLog { target: build_target(parsed) },
            None => usage(JOB_OR_BUILD_NOT_SPECIFIED),
        },
        "plugins" if tokens.is_empty() => JenkinsCommand::Plugins,
        "plugins" => help_usage("get a list of plugins"),
        "safe-restart" if tokens.is_empty() => JenkinsCommand::SafeRestart,
        "safe-restart" => help_usage("safe restart Jenkins"),
        "help" | "" => JenkinsCommand::Help,
        _ => JenkinsCommand::Unknown { verb: verb.to_owned() },
    }
}

fn parse_job_args<S: AsRef<str>>(verb: &str, tokens: &[S]) -> Option<ParsedArgs> {
    let parsed = args::parse(tokens)?;
    if parsed.unterminated_quote {
        debug!(
            event_name = "chat.command.unterminated_quote",
            verb,
            job_name = %parsed.job_name,
            "job name quote was never closed; remaining tokens folded into the job name"
        );
    }
    Some(parsed)
}

/// Job-only actions reject a trailing build number. Extra `key=value` tokens
/// are tolerated.
fn job_only<S: AsRef<str>>(
    verb: &str,
    tokens: &[S],
    missing: &str,
    help_topic: &str,
) -> Result<String, JenkinsCommand> {
    let parsed = parse_job_args(verb, tokens).ok_or_else(|| usage(missing))?;
    if parsed.build_number.is_some() {
        return Err(help_usage(help_topic));
    }
    Ok(parsed.job_name)
}

fn build_target(parsed: ParsedArgs) -> BuildTarget {
    BuildTarget { job_name: parsed.job_name, build_number: parsed.build_number }
}

fn usage(message: &str) -> JenkinsCommand {
    JenkinsCommand::Usage { message: message.to_owned() }
}

fn help_usage(topic: &str) -> JenkinsCommand {
    JenkinsCommand::Usage {
        message: format!("Please check `/jenkins help` to find help on how to {topic}."),
    }
}

pub struct CommandRouter<S> {
    service: S,
}

impl<S> CommandRouter<S>
where
    S: JenkinsCommandService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn route(
        &self,
        envelope: CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let command = classify_command(&envelope.verb, &envelope.args);
        debug!(
            event_name = "chat.command.classified",
            correlation_id = %envelope.request_id,
            verb = %envelope.verb,
            command = command_name(&command),
            "slash command classified"
        );

        match command {
            JenkinsCommand::Connect { username, token } => {
                self.service.connect(username, token, &envelope).await
            }
            JenkinsCommand::Disconnect => self.service.disconnect(&envelope).await,
            JenkinsCommand::Me => self.service.me(&envelope).await,
            JenkinsCommand::Build { job_name, parameters } => {
                self.service.build(job_name, parameters, &envelope).await
            }
            JenkinsCommand::Abort { target } => self.service.abort(target, &envelope).await,
            JenkinsCommand::Enable { job_name } => {
                self.service.set_job_enabled(job_name, true, &envelope).await
            }
            JenkinsCommand::Disable { job_name } => {
                self.service.set_job_enabled(job_name, false, &envelope).await
            }
            JenkinsCommand::Delete { job_name } => {
                self.service.delete_job(job_name, &envelope).await
            }
            JenkinsCommand::GetArtifacts { target } => {
                self.service.artifacts(target, &envelope).await
            }
            JenkinsCommand::TestResults { target } => {
                self.service.test_results(target, &envelope).await
            }
            JenkinsCommand::GetLog { target } => self.service.console_log(target, &envelope).await,
            JenkinsCommand::Plugins => self.service.plugins(&envelope).await,
            JenkinsCommand::SafeRestart => self.service.safe_restart(&envelope).await,
            JenkinsCommand::Help => Ok(blocks::help_message(&envelope.trigger)),
            JenkinsCommand::Usage { message } => Ok(blocks::notice_message(
                &message.replace("/jenkins", &envelope.trigger),
            )),
            JenkinsCommand::Unknown { verb } => {
                Ok(blocks::unknown_command_message(&verb, &envelope.trigger))
            }
        }
    }
}

fn command_name(command: &JenkinsCommand) -> &'static str {
    match command {
        JenkinsCommand::Connect { .. } => "connect",
        JenkinsCommand::Disconnect => "disconnect",
        JenkinsCommand::Me => "me",
        JenkinsCommand::Build { .. } => "build",
        JenkinsCommand::Abort { .. } => "abort",
        JenkinsCommand::Enable { .. } => "enable",
        JenkinsCommand::Disable { .. } => "disable",
        JenkinsCommand::Delete { .. } => "delete",
        JenkinsCommand::GetArtifacts { .. } => "get-artifacts",
        JenkinsCommand::TestResults { .. } => "test-results",
        JenkinsCommand::GetLog { .. } => "get-log",
        JenkinsCommand::Plugins => "plugins",
        JenkinsCommand::SafeRestart => "safe-restart",
        JenkinsCommand::Help => "help",
        JenkinsCommand::Usage { .. } => "usage",
        JenkinsCommand::Unknown { .. } => "unknown",
    }
}

#[async_trait]
pub trait JenkinsCommandService: Send + Sync {
    async fn connect(
        &self,
        username: String,
        token: String,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn disconnect(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn me(&self, envelope: &CommandEnvelope) -> Result<MessageTemplate, CommandRouteError>;

    async fn build(
        &self,
        job_name: String,
        parameters: BTreeMap<String, String>,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn abort(
        &self,
        target: BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn set_job_enabled(
        &self,
        job_name: String,
        enabled: bool,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn delete_job(
        &self,
        job_name: String,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn artifacts(
        &self,
        target: BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn test_results(
        &self,
        target: BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn console_log(
        &self,
        target: BuildTarget,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn plugins(&self, envelope: &CommandEnvelope)
        -> Result<MessageTemplate, CommandRouteError>;

    async fn safe_restart(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError>;
}

/// Echoes what would be done without contacting Jenkins.
#[derive(Default)]
pub struct NoopJenkinsCommandService;

#[async_trait]
impl JenkinsCommandService for NoopJenkinsCommandService {
    async fn connect(
        &self,
        username: String,
        _token: String,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message(&format!("Would connect as Jenkins user '{username}'.")))
    }

    async fn disconnect(
        &self,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message("Would disconnect the Jenkins account."))
    }

    async fn me(&self, _envelope: &CommandEnvelope) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message("Would display the connected Jenkins account."))
    }

    async fn build(
        &self,
        job_name: String,
        parameters: BTreeMap<String, String>,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let rendered = parameters
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(blocks::notice_message(&format!(
            "Would trigger a build of the job '{job_name}' (parameters: {})",
            if rendered.is_empty() { "none" } else { rendered.as_str() }
        )))
    }

    async fn abort(
        &self,
        target: BuildTarget,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message(&format!(
            "Would abort {} of the job '{}'.",
            target.label(),
            target.job_name
        )))
    }

    async fn set_job_enabled(
        &self,
        job_name: String,
        enabled: bool,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let action = if enabled { "enable" } else { "disable" };
        Ok(blocks::notice_message(&format!("Would {action} the job '{job_name}'.")))
    }

    async fn delete_job(
        &self,
        job_name: String,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message(&format!("Would delete the job '{job_name}'.")))
    }

    async fn artifacts(
        &self,
        target: BuildTarget,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message(&format!(
            "Would fetch artifacts of {} of the job '{}'.",
            target.label(),
            target.job_name
        )))
    }

    async fn test_results(
        &self,
        target: BuildTarget,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message(&format!(
            "Would fetch test results of {} of the job '{}'.",
            target.label(),
            target.job_name
        )))
    }

    async fn console_log(
        &self,
        target: BuildTarget,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message(&format!(
            "Would fetch the log of {} of the job '{}'.",
            target.label(),
            target.job_name
        )))
    }

    async fn plugins(
        &self,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message("Would list installed plugins."))
    }

    async fn safe_restart(
        &self,
        _envelope: &CommandEnvelope,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(blocks::notice_message("Would safe restart the Jenkins server."))
    }
}
