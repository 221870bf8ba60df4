//! HTTP endpoint for slash commands.
//!
//! - `POST /commands` - form-encoded slash command, answered with a JSON message

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Form, Json, Router};
use chatci_chat::blocks::{self, Block, MessageTemplate, ResponseVisibility};
use chatci_chat::commands::{
    normalize_command, CommandRouter, JenkinsCommandService, SlashCommandPayload,
};
use chatci_core::InterfaceError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct SlashState<S> {
    router: Arc<CommandRouter<S>>,
    trigger: String,
    verification_token: Option<SecretString>,
}

impl<S> Clone for SlashState<S> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
            trigger: self.trigger.clone(),
            verification_token: self.verification_token.clone(),
        }
    }
}

impl<S> SlashState<S> {
    pub fn new(
        router: Arc<CommandRouter<S>>,
        trigger: impl Into<String>,
        verification_token: Option<SecretString>,
    ) -> Self {
        Self { router, trigger: trigger.into(), verification_token }
    }

    fn token_matches(&self, provided: Option<&str>) -> bool {
        match &self.verification_token {
            Some(expected) => provided == Some(expected.expose_secret()),
            None => true,
        }
    }
}

/// Form body posted by the chat platform.
#[derive(Debug, Deserialize)]
pub struct SlashCommandForm {
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel_id: String,
    pub user_id: String,
    #[serde(default)]
    pub trigger_id: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SlashResponse {
    pub response_type: ResponseVisibility,
    pub text: String,
    pub blocks: Vec<Block>,
}

impl From<MessageTemplate> for SlashResponse {
    fn from(message: MessageTemplate) -> Self {
        Self { response_type: message.visibility, text: message.fallback_text, blocks: message.blocks }
    }
}

pub fn router<S>(state: SlashState<S>) -> Router
where
    S: JenkinsCommandService + 'static,
{
    Router::new().route("/commands", post(handle_command::<S>)).with_state(state)
}

pub async fn handle_command<S>(
    State(state): State<SlashState<S>>,
    Form(form): Form<SlashCommandForm>,
) -> (StatusCode, Json<SlashResponse>)
where
    S: JenkinsCommandService + 'static,
{
    let correlation_id = Uuid::new_v4().to_string();

    if !state.token_matches(form.token.as_deref()) {
        warn!(
            event_name = "http.commands.rejected",
            correlation_id = %correlation_id,
            user_id = %form.user_id,
            "slash command carried an invalid verification token"
        );
        let rejection = InterfaceError::Unauthorized {
            message: "verification token mismatch".to_owned(),
            correlation_id: correlation_id.clone(),
        };
        return reply(StatusCode::UNAUTHORIZED, blocks::error_message(&rejection.to_string(), &correlation_id));
    }

    let payload = SlashCommandPayload {
        command: form.command,
        text: form.text,
        channel_id: form.channel_id,
        user_id: form.user_id,
        trigger_id: form.trigger_id,
        request_id: correlation_id.clone(),
    };

    let envelope = match normalize_command(payload, &state.trigger) {
        Ok(envelope) => envelope,
        Err(parse_error) => {
            let interface = InterfaceError::BadRequest {
                message: parse_error.to_string(),
                correlation_id: correlation_id.clone(),
            };
            return reply(
                StatusCode::BAD_REQUEST,
                blocks::error_message(&interface.to_string(), interface.correlation_id()),
            );
        }
    };

    info!(
        event_name = "http.commands.received",
        correlation_id = %correlation_id,
        user_id = %envelope.user_id,
        channel_id = %envelope.channel_id,
        verb = %envelope.verb,
        "slash command received"
    );

    match state.router.route(envelope).await {
        Ok(message) => reply(StatusCode::OK, message),
        Err(route_error) => {
            let interface = InterfaceError::Internal {
                message: route_error.to_string(),
                correlation_id: correlation_id.clone(),
            };
            error!(
                event_name = "http.commands.failed",
                correlation_id = %correlation_id,
                error = %interface,
                "slash command routing failed"
            );
            reply(
                StatusCode::OK,
                blocks::error_message(interface.user_message(), interface.correlation_id()),
            )
        }
    }
}

fn reply(status: StatusCode, message: MessageTemplate) -> (StatusCode, Json<SlashResponse>) {
    (status, Json(SlashResponse::from(message)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use chatci_chat::commands::{CommandRouter, NoopJenkinsCommandService};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{router, SlashState};

    fn app(token: Option<&str>) -> Router {
        router(SlashState::new(
            Arc::new(CommandRouter::new(NoopJenkinsCommandService)),
            "/jenkins",
            token.map(|token| token.to_owned().into()),
        ))
    }

    async fn post_form(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/commands")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn help_is_answered_ephemerally() {
        let (status, body) =
            post_form(app(None), "command=%2Fjenkins&text=help&channel_id=C1&user_id=U1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response_type"], "ephemeral");
        assert_eq!(body["blocks"][0]["type"], "section");
    }

    #[tokio::test]
    async fn quoted_job_names_reach_the_service() {
        let (status, body) = post_form(
            app(None),
            "command=%2Fjenkins&text=disable+%22my+folder%2Fapp%22&channel_id=C1&user_id=U1",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Would disable the job 'my folder/app'.");
    }

    #[tokio::test]
    async fn verification_token_is_enforced_when_configured() {
        let (status, _) = post_form(
            app(Some("secret")),
            "command=%2Fjenkins&text=me&user_id=U1&token=wrong",
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = post_form(app(Some("secret")), "command=%2Fjenkins&text=me&user_id=U1").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = post_form(
            app(Some("secret")),
            "command=%2Fjenkins&text=me&user_id=U1&token=secret",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Would display the connected Jenkins account.");
    }

    #[tokio::test]
    async fn other_triggers_are_rejected() {
        let (status, body) = post_form(app(None), "command=%2Fdeploy&text=help&user_id=U1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["text"].as_str().unwrap_or_default().contains("/deploy"));
    }
}
