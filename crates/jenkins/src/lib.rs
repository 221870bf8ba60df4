//! Jenkins REST client
//!
//! Thin wrapper over the handful of Jenkins endpoints the slash commands need.
//! Every call is made on behalf of a chat user, using that user's API token
//! over HTTP basic auth.
//!
//! - **Client** (`client`) - `JenkinsApi` trait and its reqwest implementation
//! - **Models** (`models`) - JSON payloads returned by Jenkins

pub mod client;
pub mod models;

pub use client::{JenkinsApi, JenkinsClient, JenkinsError};
pub use reqwest::StatusCode;
