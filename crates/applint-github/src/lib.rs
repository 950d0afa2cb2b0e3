//! applint GitHub - REST platform client
//!
//! Implements `applint_core::Platform` against the GitHub REST API:
//! compare, recursive tree, contents, issue comments and check runs.

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::GitHubClient;
pub use config::{parse_repository, GitHubConfig, DEFAULT_API_URL};
pub use error::GitHubError;
