//! Chat integration - slash command interface
//!
//! This crate turns `/jenkins ...` slash commands into Jenkins actions:
//! - **Slash Commands** (`commands`) - `/jenkins build`, `/jenkins get-log`, etc.
//! - **Messages** (`blocks`) - structured replies (sections, context, link buttons)
//!
//! # Architecture
//!
//! ```text
//! SlashCommandPayload → normalize_command → CommandRouter → JenkinsCommandService
//!                                                ↓
//!                                   MessageTemplate ← Response
//! ```
//!
//! # Key Types
//!
//! - `CommandRouter` - classifies the verb, validates arguments, calls the service
//! - `JenkinsCommandService` - trait implemented by the server against Jenkins
//! - `MessageBuilder` - constructs chat replies

pub mod blocks;
pub mod commands;
