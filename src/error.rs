//! Error types for herald modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from GitHub access and the pull request cache.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no token found. Set GITHUB_TOKEN or run 'gh auth login'"
    )]
    AuthenticationFailed,

    #[error("Failed to build GitHub client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("Failed to fetch pull request page {page}: {source}")]
    Network {
        page: u32,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Rate limited by GitHub API while fetching page {page}")]
    RateLimited { page: u32 },

    #[error("Repository not found: {owner}/{repo}")]
    RepositoryNotFound { owner: String, repo: String },

    #[error("Pull request fetch task failed: {0}")]
    FetchTask(#[source] tokio::task::JoinError),

    #[error("Pull request listing unavailable after an earlier fetch failure")]
    FetchUnavailable,

    #[error("No usable 'origin' remote: {0}")]
    NoOriginRemote(#[source] git2::Error),

    #[error("Failed to parse repository URL")]
    InvalidRepositoryUrl,
}

/// Errors from reading the release list.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Failed to read releases from {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse releases: {0}")]
    ParseFailed(#[source] serde_json::Error),
}

/// Errors from writing the changelog.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to write changelog: {0}")]
    WriteFailed(#[source] std::io::Error),
}

/// Errors from manifest version updates.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("Invalid workspace pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Any failure that aborts a changelog run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Release(#[from] ReleaseError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Failed to move {} into place: {source}", path.display())]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stage written files in git: {0}")]
    StagingFailed(#[source] git2::Error),
}
