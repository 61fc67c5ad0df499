//! GitHub token discovery.
//!
//! Sources, first match wins:
//! 1. `GITHUB_TOKEN`
//! 2. `GH_TOKEN`
//! 3. `gh auth token` from an authenticated gh CLI

use std::env;
use std::process::Command;

use tracing::debug;

use crate::error::GitHubError;

const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Find a GitHub token in the environment or the gh CLI.
pub fn get_github_token() -> Result<String, GitHubError> {
    if let Some((var, token)) = token_from_env() {
        debug!(source = var, "Using GitHub token from environment");
        return Ok(token);
    }

    if let Some(token) = token_from_gh_cli() {
        debug!(source = "gh", "Using GitHub token from gh CLI");
        return Ok(token);
    }

    Err(GitHubError::AuthenticationFailed)
}

fn token_from_env() -> Option<(&'static str, String)> {
    TOKEN_VARS.iter().find_map(|var| {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|v| (*var, v))
    })
}

fn token_from_gh_cli() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
