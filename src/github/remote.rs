//! Repository identity: owner/name from flags or from the `origin` remote.

use std::fmt;
use std::path::Path;

use git2::Repository;

use crate::error::GitHubError;

/// An `owner/name` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Web URL of the release page for a tag.
    pub fn release_url(&self, tag: &str) -> String {
        format!(
            "https://github.com/{}/{}/releases/tag/{}",
            self.owner, self.name, tag
        )
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Read the `origin` remote of the repository at `path`.
pub fn detect_origin_repo(path: &Path) -> Result<RepoRef, GitHubError> {
    let repo = Repository::discover(path).map_err(GitHubError::NoOriginRemote)?;
    let remote = repo
        .find_remote("origin")
        .map_err(GitHubError::NoOriginRemote)?;
    let url = remote.url().ok_or(GitHubError::InvalidRepositoryUrl)?;
    parse_github_remote(url)
}

/// Extract owner and repo from a GitHub remote URL (SSH or HTTPS).
pub fn parse_github_remote(url: &str) -> Result<RepoRef, GitHubError> {
    let path = if let Some(rest) = url.strip_prefix("git@github.com:") {
        rest
    } else if let Some((_, rest)) = url.split_once("github.com/") {
        rest
    } else {
        return Err(GitHubError::InvalidRepositoryUrl);
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    match path.split('/').collect::<Vec<_>>().as_slice() {
        [owner, name, ..] if !owner.is_empty() && !name.is_empty() => Ok(RepoRef::new(*owner, *name)),
        _ => Err(GitHubError::InvalidRepositoryUrl),
    }
}
