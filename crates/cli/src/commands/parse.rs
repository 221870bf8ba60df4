use chatci_core::args;

use crate::commands::CommandResult;

/// Parses job arguments the same way the slash commands do. `text` is split
/// on whitespace first; otherwise `tokens` are used as given.
pub fn run(text: Option<&str>, tokens: &[String]) -> CommandResult {
    let tokens: Vec<&str> = match text {
        Some(text) => args::split_tokens(text),
        None => tokens.iter().map(String::as_str).collect(),
    };

    let Some(parsed) = args::parse(&tokens) else {
        return CommandResult::failure("parse", "usage", "no job arguments were given", 2);
    };

    let message = if parsed.unterminated_quote {
        "parsed job arguments (opening quote was never closed)"
    } else {
        "parsed job arguments"
    };

    match serde_json::to_value(&parsed) {
        Ok(data) => CommandResult::success_with("parse", message, Some(data)),
        Err(error) => CommandResult::failure("parse", "serialization", error.to_string(), 3),
    }
}
