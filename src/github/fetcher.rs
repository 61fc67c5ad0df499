//! Page-at-a-time access to a repository's closed pull requests.

use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use tracing::debug;

use crate::error::GitHubError;

use super::records::PullRequestRecord;
use super::remote::RepoRef;

/// GitHub's maximum page size for the pulls endpoint.
pub const MAX_PER_PAGE: u8 = 100;

/// A source of pull request records, one page per call.
///
/// Implementations return an empty page once the source has nothing left.
/// Errors are not retried here; they go straight back to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send {
    /// Fetch the next page of records.
    async fn next(&mut self) -> Result<Vec<PullRequestRecord>, GitHubError>;
}

/// Fetches `GET /repos/{owner}/{repo}/pulls?state=closed` one page at a time.
pub struct GitHubPageFetcher {
    client: Octocrab,
    repo: RepoRef,
    per_page: u8,
    page: u32,
}

impl GitHubPageFetcher {
    /// Build a fetcher from a personal access token.
    pub fn from_token(token: &str, repo: RepoRef) -> Result<Self, GitHubError> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .add_retry_config(RetryConfig::None)
            .build()
            .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;

        Ok(Self::with_client(client, repo))
    }

    /// Build an unauthenticated fetcher against another API root.
    ///
    /// Used for GitHub Enterprise hosts and for mock servers in tests.
    pub fn with_base_uri(base_uri: &str, repo: RepoRef) -> Result<Self, GitHubError> {
        let client = Octocrab::builder()
            .base_uri(base_uri)
            .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?
            .add_retry_config(RetryConfig::None)
            .build()
            .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;

        Ok(Self::with_client(client, repo))
    }

    /// Build a fetcher around a pre-configured client.
    ///
    /// The client should have retries disabled; failed pages are not retried.
    pub fn with_client(client: Octocrab, repo: RepoRef) -> Self {
        Self {
            client,
            repo,
            per_page: MAX_PER_PAGE,
            page: 1,
        }
    }

    /// Set the page size, clamped to `1..=100`.
    pub fn per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// The page number the next call will request.
    pub fn current_page(&self) -> u32 {
        self.page
    }

    fn classify_error(&self, page: u32, e: octocrab::Error) -> GitHubError {
        // octocrab surfaces GitHub's message in Display for some errors and
        // only in Debug for others
        let display = e.to_string();
        let debug = format!("{:?}", e);

        if display.to_lowercase().contains("rate limit") || debug.to_lowercase().contains("rate limit") {
            return GitHubError::RateLimited { page };
        }
        if display.contains("Not Found") || debug.contains("Not Found") {
            return GitHubError::RepositoryNotFound {
                owner: self.repo.owner.clone(),
                repo: self.repo.name.clone(),
            };
        }
        GitHubError::Network {
            page,
            source: Box::new(e),
        }
    }
}

#[async_trait]
impl PageFetcher for GitHubPageFetcher {
    async fn next(&mut self) -> Result<Vec<PullRequestRecord>, GitHubError> {
        let page = self.page;
        self.page += 1;

        let first = (page - 1) * u32::from(self.per_page);
        debug!(
            page,
            "Fetching closed pull requests {} - {}",
            first,
            first + u32::from(self.per_page) - 1
        );

        let result = self
            .client
            .pulls(&self.repo.owner, &self.repo.name)
            .list()
            .state(octocrab::params::State::Closed)
            .per_page(self.per_page)
            .page(page)
            .send()
            .await;

        let items = match result {
            Ok(p) => p.items,
            Err(e) => return Err(self.classify_error(page, e)),
        };

        let records: Vec<PullRequestRecord> = items
            .into_iter()
            .map(PullRequestRecord::from_octocrab)
            .collect();

        debug!(page, count = records.len(), "Received pull request page");

        Ok(records)
    }
}
