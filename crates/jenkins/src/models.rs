use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsUser {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct JobInfo {
    #[serde(default)]
    pub property: Vec<JobProperty>,
}

impl JobInfo {
    pub fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        self.property
            .iter()
            .flat_map(|property| property.parameter_definitions.iter().cloned())
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProperty {
    #[serde(default)]
    pub parameter_definitions: Vec<ParameterDefinition>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_parameter_value: Option<DefaultParameterValue>,
}

impl ParameterDefinition {
    /// Default value rendered as plain text, if Jenkins reported one.
    pub fn default_value(&self) -> Option<String> {
        let value = self.default_parameter_value.as_ref()?.value.as_ref()?;
        match value {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DefaultParameterValue {
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub number: u64,
    pub url: String,
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub file_name: String,
    pub relative_path: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtifactLink {
    pub file_name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    #[serde(default)]
    pub fail_count: u64,
    #[serde(default)]
    pub pass_count: u64,
    #[serde(default)]
    pub skip_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestResults {
    pub report: TestReport,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PluginList {
    #[serde(default)]
    pub plugins: Vec<PluginInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    pub short_name: String,
    #[serde(default)]
    pub long_name: Option<String>,
    pub version: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedBuild {
    /// `Location` header of the queue item, when Jenkins returned one.
    pub queue_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{BuildInfo, JobInfo, PluginList, TestReport};

    #[test]
    fn job_info_collects_parameter_definitions_across_properties() {
        let payload = r#"{
            "_class": "hudson.model.FreeStyleProject",
            "property": [
                {"_class": "jenkins.model.BuildDiscarderProperty"},
                {
                    "_class": "hudson.model.ParametersDefinitionProperty",
                    "parameterDefinitions": [
                        {"name": "BRANCH", "type": "StringParameterDefinition",
                         "defaultParameterValue": {"value": "main"}},
                        {"name": "DRY_RUN", "type": "BooleanParameterDefinition",
                         "defaultParameterValue": {"value": false}},
                        {"name": "TOKEN", "type": "PasswordParameterDefinition"}
                    ]
                }
            ]
        }"#;

        let info: JobInfo = serde_json::from_str(payload).expect("decode job info");
        let definitions = info.parameter_definitions();

        assert_eq!(definitions.len(), 3);
        assert_eq!(definitions[0].name, "BRANCH");
        assert_eq!(definitions[0].default_value().as_deref(), Some("main"));
        assert_eq!(definitions[1].default_value().as_deref(), Some("false"));
        assert_eq!(definitions[2].default_value(), None);
    }

    #[test]
    fn job_without_properties_has_no_parameters() {
        let info: JobInfo = serde_json::from_str("{}").expect("decode job info");
        assert!(info.parameter_definitions().is_empty());
    }

    #[test]
    fn build_info_decodes_artifacts() {
        let payload = r#"{
            "number": 42,
            "url": "https://ci.example/job/app/42/",
            "building": false,
            "result": "SUCCESS",
            "artifacts": [
                {"displayPath": "app.tar.gz", "fileName": "app.tar.gz", "relativePath": "dist/app.tar.gz"}
            ]
        }"#;

        let build: BuildInfo = serde_json::from_str(payload).expect("decode build");
        assert_eq!(build.number, 42);
        assert_eq!(build.result.as_deref(), Some("SUCCESS"));
        assert_eq!(build.artifacts[0].relative_path, "dist/app.tar.gz");
    }

    #[test]
    fn test_report_and_plugins_decode() {
        let report: TestReport =
            serde_json::from_str(r#"{"failCount": 2, "passCount": 40, "skipCount": 1, "suites": []}"#)
                .expect("decode report");
        assert_eq!(report, TestReport { fail_count: 2, pass_count: 40, skip_count: 1 });

        let plugins: PluginList = serde_json::from_str(
            r#"{"plugins": [{"shortName": "git", "longName": "Git plugin", "version": "5.2.1", "active": true}]}"#,
        )
        .expect("decode plugins");
        assert_eq!(plugins.plugins[0].short_name, "git");
        assert!(plugins.plugins[0].active);
    }
}
