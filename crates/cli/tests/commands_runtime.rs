use std::env;
use std::sync::{Mutex, OnceLock};

use chatci_cli::commands::{config, dispatch, parse, verify};
use serde_json::Value;

fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[test]
fn parse_reports_job_build_and_parameters() {
    let result = parse::run(None, &tokens(&["\"folder", "with", "space/app\"", "22", "BRANCH=main"]));
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "parse");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["data"]["job_name"], "folder with space/app");
    assert_eq!(payload["data"]["build_number"], "22");
    assert_eq!(payload["data"]["parameters"]["BRANCH"], "main");
    assert!(payload["data"].get("unterminated_quote").is_none());
}

#[test]
fn parse_splits_raw_text_like_the_chat_platform() {
    let result = parse::run(Some("  \"my   job\"   param=1 "), &[]);
    let payload = parse_payload(&result.output);

    assert_eq!(payload["data"]["job_name"], "my job");
    assert_eq!(payload["data"]["build_number"], Value::Null);
    assert_eq!(payload["data"]["parameters"]["param"], "1");
}

#[test]
fn parse_flags_unterminated_quotes() {
    let result = parse::run(None, &tokens(&["\"never", "closed", "5"]));
    let payload = parse_payload(&result.output);

    assert_eq!(payload["data"]["job_name"], "never closed 5");
    assert_eq!(payload["data"]["unterminated_quote"], true);
    assert!(payload["message"].as_str().unwrap_or_default().contains("never closed"));
}

#[test]
fn parse_without_tokens_is_a_usage_error() {
    let result = parse::run(None, &[]);
    assert_eq!(result.exit_code, 2);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "usage");
}

#[test]
fn dispatch_renders_usage_messages_locally() {
    let result = dispatch::run("disable app 12", "/jenkins");
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["data"]["verb"], "disable");
    assert_eq!(payload["data"]["response_type"], "ephemeral");
    assert_eq!(
        payload["message"],
        "Please check `/jenkins help` to find help on how to disable a job."
    );
}

#[test]
fn dispatch_routes_valid_commands_to_the_noop_service() {
    let result = dispatch::run("/ci get-log \"my app\" 7", "/ci");
    let payload = parse_payload(&result.output);

    assert_eq!(payload["data"]["verb"], "get-log");
    assert_eq!(payload["message"], "Would fetch the log of build #7 of the job 'my app'.");
}

#[test]
fn dispatch_reports_unknown_commands_with_help() {
    let result = dispatch::run("createjob", "/jenkins");
    let payload = parse_payload(&result.output);

    assert_eq!(payload["message"], "Unknown command: createjob");
    assert_eq!(payload["data"]["blocks"].as_array().map(Vec::len), Some(2));
}

#[test]
fn dispatch_rejects_invalid_trigger() {
    let result = dispatch::run("help", "jenkins");
    assert_eq!(result.exit_code, 2);
    assert_eq!(parse_payload(&result.output)["error_class"], "usage");
}

#[test]
fn config_reports_env_sources_and_redacts_token() {
    with_env(
        &[
            ("CHATCI_JENKINS_BASE_URL", "https://ci.example.com"),
            ("CHATCI_CHAT_VERIFICATION_TOKEN", "verysecretverificationtoken"),
            ("CHATCI_LOG_LEVEL", "debug"),
        ],
        || {
            let output = config::run();

            assert!(output.contains(
                "- jenkins.base_url = https://ci.example.com (source: env (CHATCI_JENKINS_BASE_URL))"
            ));
            assert!(output.contains("- chat.verification_token = very***"));
            assert!(!output.contains("verysecretverificationtoken"));
            assert!(output.contains("- logging.level = debug (source: env (CHATCI_LOG_LEVEL))"));
            assert!(output.contains("- chat.command_trigger = /jenkins (source: default)"));
        },
    );
}

#[test]
fn config_reports_validation_failure_without_base_url() {
    with_env(&[], || {
        let output = config::run();
        assert!(output.starts_with("config validation failed"));
        assert!(output.contains("jenkins.base_url"));
    });
}

#[test]
fn verify_requires_valid_config() {
    with_env(&[(verify::TOKEN_ENV, "token")], || {
        let result = verify::run("alice");
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn verify_requires_token_in_environment() {
    with_env(&[("CHATCI_JENKINS_BASE_URL", "https://ci.example.com")], || {
        let result = verify::run("alice");
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "verify");
        assert_eq!(payload["error_class"], "missing_token");
        assert!(payload["message"].as_str().unwrap_or_default().contains("JENKINS_API_TOKEN"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CHATCI_JENKINS_BASE_URL",
        "CHATCI_JENKINS_TIMEOUT_SECS",
        "CHATCI_CHAT_COMMAND_TRIGGER",
        "CHATCI_CHAT_VERIFICATION_TOKEN",
        "CHATCI_SERVER_BIND_ADDRESS",
        "CHATCI_SERVER_PORT",
        "CHATCI_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "CHATCI_LOGGING_LEVEL",
        "CHATCI_LOGGING_FORMAT",
        "CHATCI_LOG_LEVEL",
        "CHATCI_LOG_FORMAT",
        verify::TOKEN_ENV,
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
