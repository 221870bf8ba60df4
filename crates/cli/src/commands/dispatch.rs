use chatci_chat::commands::{
    normalize_command, CommandRouter, NoopJenkinsCommandService, SlashCommandPayload,
};
use serde_json::json;

use crate::commands::CommandResult;

/// Routes `text` through the slash command dispatcher without contacting
/// Jenkins, and reports the reply that would be sent.
pub fn run(text: &str, trigger: &str) -> CommandResult {
    if !trigger.starts_with('/') || trigger.len() < 2 {
        return CommandResult::failure(
            "dispatch",
            "usage",
            format!("trigger `{trigger}` must be a word starting with `/`"),
            2,
        );
    }

    let payload = SlashCommandPayload {
        command: trigger.to_string(),
        text: text.to_string(),
        channel_id: "cli".to_string(),
        user_id: "cli".to_string(),
        trigger_id: String::new(),
        request_id: "cli-dispatch".to_string(),
    };

    let envelope = match normalize_command(payload, trigger) {
        Ok(envelope) => envelope,
        Err(error) => return CommandResult::failure("dispatch", "usage", error.to_string(), 2),
    };
    let verb = envelope.verb.clone();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "dispatch",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let router = CommandRouter::new(NoopJenkinsCommandService);
    match runtime.block_on(router.route(envelope)) {
        Ok(message) => CommandResult::success_with(
            "dispatch",
            message.fallback_text.clone(),
            Some(json!({
                "verb": verb,
                "response_type": message.visibility,
                "blocks": message.blocks,
            })),
        ),
        Err(error) => CommandResult::failure("dispatch", "routing", error.to_string(), 4),
    }
}
