use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A job name split into its folder segments, e.g. `team/app/deploy`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobPath {
    segments: Vec<String>,
}

impl JobPath {
    pub fn parse(job_name: &str) -> Result<Self, DomainError> {
        if job_name.trim().is_empty() {
            return Err(DomainError::InvalidJobPath {
                job_name: job_name.to_owned(),
                reason: "job name is empty".to_owned(),
            });
        }

        let segments = job_name.split('/').map(str::to_owned).collect::<Vec<_>>();
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(DomainError::InvalidJobPath {
                job_name: job_name.to_owned(),
                reason: "folder segments must not be empty".to_owned(),
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

}

impl fmt::Display for JobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildSelector {
    Last,
    Number(String),
}

impl BuildSelector {
    pub fn from_build_number(build_number: Option<&str>) -> Self {
        match build_number {
            Some(number) => Self::Number(number.to_owned()),
            None => Self::Last,
        }
    }

    /// Path segment Jenkins uses to address the build.
    pub fn path_segment(&self) -> &str {
        match self {
            Self::Last => "lastBuild",
            Self::Number(number) => number.trim_start_matches('+'),
        }
    }
}
