use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    jenkins_base_url: String,
    command_trigger: String,
    started_at: DateTime<Utc>,
}

impl HealthState {
    pub fn new(jenkins_base_url: impl Into<String>, command_trigger: impl Into<String>) -> Self {
        Self {
            jenkins_base_url: jenkins_base_url.into(),
            command_trigger: command_trigger.into(),
            started_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub jenkins: HealthCheck,
    pub started_at: String,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Reports process liveness. Jenkins is not contacted; calls are made with
/// per-user credentials, so there is no service identity to probe with.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let jenkins = if state.jenkins_base_url.trim().is_empty() {
        HealthCheck { status: "degraded", detail: "jenkins base url is not configured".to_string() }
    } else {
        HealthCheck { status: "ready", detail: format!("configured for {}", state.jenkins_base_url) }
    };
    let ready = jenkins.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: format!("serving {} slash commands", state.command_trigger),
        },
        jenkins,
        started_at: state.started_at.to_rfc3339(),
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_returns_ready_when_jenkins_is_configured() {
        let (status, Json(payload)) =
            health(State(HealthState::new("https://ci.example.com", "/jenkins"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.jenkins.status, "ready");
        assert!(payload.service.detail.contains("/jenkins"));
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_without_jenkins_url() {
        let (status, Json(payload)) = health(State(HealthState::new("", "/jenkins"))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }
}
