//! Core of the chat-to-Jenkins bridge: slash-command argument parsing, job
//! addressing, configuration, credential storage and the error taxonomy shared
//! by the transport crates.

pub mod args;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod errors;

pub use args::{parse, quote_job_name, split_tokens, ParsedArgs};
pub use credentials::{CredentialStore, InMemoryCredentialStore, JenkinsCredentials};
pub use domain::job::{BuildSelector, JobPath};
pub use errors::{ApplicationError, DomainError, InterfaceError};
