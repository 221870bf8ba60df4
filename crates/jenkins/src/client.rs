use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chatci_core::{ApplicationError, BuildSelector, JenkinsCredentials, JobPath};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    ArtifactLink, BuildInfo, JenkinsUser, JobInfo, PluginInfo, PluginList, QueuedBuild,
    TestReport, TestResults,
};

#[derive(Debug, Error)]
pub enum JenkinsError {
    #[error("invalid Jenkins base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Jenkins rejected the credentials ({0})")]
    Unauthorized(StatusCode),
    #[error("Jenkins resource not found: {0}")]
    NotFound(String),
    #[error("Jenkins returned {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("Jenkins request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<JenkinsError> for ApplicationError {
    fn from(value: JenkinsError) -> Self {
        match value {
            JenkinsError::InvalidBaseUrl { .. } => Self::Configuration(value.to_string()),
            other => Self::Integration(other.to_string()),
        }
    }
}

/// Jenkins operations the slash commands rely on.
#[async_trait]
pub trait JenkinsApi: Send + Sync {
    async fn whoami(&self, credentials: &JenkinsCredentials) -> Result<JenkinsUser, JenkinsError>;

    async fn job_info(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
    ) -> Result<JobInfo, JenkinsError>;

    async fn trigger_build(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        parameters: &BTreeMap<String, String>,
    ) -> Result<QueuedBuild, JenkinsError>;

    async fn abort_build(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        build: &BuildSelector,
    ) -> Result<(), JenkinsError>;

    async fn set_job_enabled(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        enabled: bool,
    ) -> Result<(), JenkinsError>;

    async fn delete_job(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
    ) -> Result<(), JenkinsError>;

    async fn artifacts(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        build: &BuildSelector,
    ) -> Result<Vec<ArtifactLink>, JenkinsError>;

    async fn test_results(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        build: &BuildSelector,
    ) -> Result<TestResults, JenkinsError>;

    async fn console_log(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        build: &BuildSelector,
    ) -> Result<String, JenkinsError>;

    async fn plugins(
        &self,
        credentials: &JenkinsCredentials,
    ) -> Result<Vec<PluginInfo>, JenkinsError>;

    async fn safe_restart(&self, credentials: &JenkinsCredentials) -> Result<(), JenkinsError>;
}

#[derive(Clone, Debug)]
pub struct JenkinsClient {
    http: Client,
    base_url: Url,
}

impl JenkinsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, JenkinsError> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/job/<folder>/job/<name>/<suffix...>`, each segment percent-encoded.
    pub fn job_url(&self, job: &JobPath, suffix: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            for segment in job.segments() {
                segments.push("job").push(segment);
            }
            segments.extend(suffix);
        }
        url
    }

    pub fn root_url(&self, suffix: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(suffix);
        }
        url
    }

    fn request(&self, method: Method, url: Url, credentials: &JenkinsCredentials) -> RequestBuilder {
        debug!(method = %method, url = %url, username = %credentials.username, "jenkins request");
        self.http
            .request(method, url)
            .basic_auth(&credentials.username, Some(credentials.expose_token()))
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, JenkinsError> {
        let response = request.send().await?;
        check_status(response, url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        credentials: &JenkinsCredentials,
    ) -> Result<T, JenkinsError> {
        let request = self.request(Method::GET, url.clone(), credentials);
        let response = self.send(request, &url).await?;
        Ok(response.json::<T>().await?)
    }

    async fn post(&self, url: Url, credentials: &JenkinsCredentials) -> Result<Response, JenkinsError> {
        let request = self.request(Method::POST, url.clone(), credentials);
        self.send(request, &url).await
    }
}

#[async_trait]
impl JenkinsApi for JenkinsClient {
    async fn whoami(&self, credentials: &JenkinsCredentials) -> Result<JenkinsUser, JenkinsError> {
        self.get_json(self.root_url(&["me", "api", "json"]), credentials).await
    }

    async fn job_info(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
    ) -> Result<JobInfo, JenkinsError> {
        self.get_json(self.job_url(job, &["api", "json"]), credentials).await
    }

    async fn trigger_build(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        parameters: &BTreeMap<String, String>,
    ) -> Result<QueuedBuild, JenkinsError> {
        let endpoint = if parameters.is_empty() { "build" } else { "buildWithParameters" };
        let mut url = self.job_url(job, &[endpoint]);
        if !parameters.is_empty() {
            url.query_pairs_mut().extend_pairs(parameters.iter());
        }

        let response = self.post(url, credentials).await?;
        let queue_url = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Ok(QueuedBuild { queue_url })
    }

    async fn abort_build(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        build: &BuildSelector,
    ) -> Result<(), JenkinsError> {
        self.post(self.job_url(job, &[build.path_segment(), "stop"]), credentials).await?;
        Ok(())
    }

    async fn set_job_enabled(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        enabled: bool,
    ) -> Result<(), JenkinsError> {
        let action = if enabled { "enable" } else { "disable" };
        self.post(self.job_url(job, &[action]), credentials).await?;
        Ok(())
    }

    async fn delete_job(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
    ) -> Result<(), JenkinsError> {
        self.post(self.job_url(job, &["doDelete"]), credentials).await?;
        Ok(())
    }

    async fn artifacts(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        build: &BuildSelector,
    ) -> Result<Vec<ArtifactLink>, JenkinsError> {
        let build: BuildInfo =
            self.get_json(self.job_url(job, &[build.path_segment(), "api", "json"]), credentials)
                .await?;
        Ok(artifact_links(&build))
    }

    async fn test_results(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        build: &BuildSelector,
    ) -> Result<TestResults, JenkinsError> {
        let report: TestReport = self
            .get_json(
                self.job_url(job, &[build.path_segment(), "testReport", "api", "json"]),
                credentials,
            )
            .await?;
        let url = self.job_url(job, &[build.path_segment(), "testReport", ""]).to_string();
        Ok(TestResults { report, url })
    }

    async fn console_log(
        &self,
        credentials: &JenkinsCredentials,
        job: &JobPath,
        build: &BuildSelector,
    ) -> Result<String, JenkinsError> {
        let url = self.job_url(job, &[build.path_segment(), "consoleText"]);
        let request = self.request(Method::GET, url.clone(), credentials);
        let response = self.send(request, &url).await?;
        Ok(response.text().await?)
    }

    async fn plugins(
        &self,
        credentials: &JenkinsCredentials,
    ) -> Result<Vec<PluginInfo>, JenkinsError> {
        let mut url = self.root_url(&["pluginManager", "api", "json"]);
        url.query_pairs_mut().append_pair("depth", "1");
        let list: PluginList = self.get_json(url, credentials).await?;
        Ok(list.plugins)
    }

    async fn safe_restart(&self, credentials: &JenkinsCredentials) -> Result<(), JenkinsError> {
        self.post(self.root_url(&["safeRestart"]), credentials).await?;
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, JenkinsError> {
    let url = Url::parse(raw.trim()).map_err(|error| JenkinsError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: error.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(JenkinsError::InvalidBaseUrl {
            url: raw.to_owned(),
            reason: "expected an http(s) url".to_owned(),
        });
    }
    Ok(url)
}

fn check_status(response: Response, url: &Url) -> Result<Response, JenkinsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(JenkinsError::Unauthorized(status)),
        StatusCode::NOT_FOUND => Err(JenkinsError::NotFound(url.path().to_owned())),
        _ => Err(JenkinsError::Status { status, url: url.to_string() }),
    }
}

fn artifact_links(build: &BuildInfo) -> Vec<ArtifactLink> {
    let base = build.url.trim_end_matches('/');
    build
        .artifacts
        .iter()
        .map(|artifact| ArtifactLink {
            file_name: artifact.file_name.clone(),
            url: format!("{base}/artifact/{}", artifact.relative_path),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chatci_core::{ApplicationError, BuildSelector, JobPath};

    use super::{artifact_links, JenkinsClient, JenkinsError};
    use crate::models::{Artifact, BuildInfo};

    fn client(base: &str) -> JenkinsClient {
        JenkinsClient::new(base, Duration::from_secs(5)).expect("valid client")
    }

    #[test]
    fn job_url_nests_folders() {
        let client = client("https://ci.example.com");
        let job = JobPath::parse("team/app/deploy").expect("job path");

        let url = client.job_url(&job, &["api", "json"]);
        assert_eq!(url.as_str(), "https://ci.example.com/job/team/job/app/job/deploy/api/json");
    }

    #[test]
    fn job_url_keeps_context_path_and_encodes_spaces() {
        let client = client("https://ci.example.com/jenkins/");
        let job = JobPath::parse("folder with space/job").expect("job path");

        let url = client.job_url(&job, &[BuildSelector::Last.path_segment(), "stop"]);
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/jenkins/job/folder%20with%20space/job/job/lastBuild/stop"
        );
    }

    #[test]
    fn root_url_appends_segments() {
        let client = client("http://localhost:8080/");
        assert_eq!(client.root_url(&["safeRestart"]).as_str(), "http://localhost:8080/safeRestart");
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(matches!(
            JenkinsClient::new("ftp://ci.example.com", Duration::from_secs(5)),
            Err(JenkinsError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            JenkinsClient::new("not a url", Duration::from_secs(5)),
            Err(JenkinsError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn artifact_links_are_absolute() {
        let build = BuildInfo {
            number: 7,
            url: "https://ci.example.com/job/app/7/".to_owned(),
            building: false,
            result: Some("SUCCESS".to_owned()),
            artifacts: vec![Artifact {
                file_name: "app.jar".to_owned(),
                relative_path: "target/app.jar".to_owned(),
            }],
        };

        let links = artifact_links(&build);
        assert_eq!(links[0].url, "https://ci.example.com/job/app/7/artifact/target/app.jar");
    }

    #[test]
    fn errors_map_into_application_errors() {
        let invalid = JenkinsError::InvalidBaseUrl { url: "x".to_owned(), reason: "bad".to_owned() };
        assert!(matches!(ApplicationError::from(invalid), ApplicationError::Configuration(_)));

        let missing = JenkinsError::NotFound("/job/app".to_owned());
        assert!(matches!(ApplicationError::from(missing), ApplicationError::Integration(_)));
    }
}
