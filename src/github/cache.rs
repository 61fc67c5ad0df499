//! Lookahead cache over the paged pull request listing.
//!
//! GitHub can only enumerate closed pull requests page by page, but the
//! changelog needs to look them up by merge commit. The cache bridges the
//! two: it keeps every record it has seen in a map keyed by merge commit
//! hash, and pulls more pages only when a lookup misses.
//!
//! Exactly one page fetch is in flight at any time. It is started as soon
//! as the previous page arrives, before that page's records are merged, so
//! the network round trip for page N+1 overlaps with whatever the caller
//! does with the results of page N.

use std::collections::HashMap;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::GitHubError;

use super::fetcher::PageFetcher;
use super::records::PullRequestRecord;

/// Pages to consume before giving up on finding more keys.
pub const DEFAULT_PAGE_LIMIT: u32 = 500;

/// The in-flight fetch owns the fetcher and hands it back with the page.
type FetchOutcome<F> = (F, Result<Vec<PullRequestRecord>, GitHubError>);

/// Point lookups by merge commit hash over a [`PageFetcher`].
///
/// Must be created inside a Tokio runtime: construction starts the fetch
/// for the first page.
pub struct LookaheadCache<F: PageFetcher + 'static> {
    pending: Option<JoinHandle<FetchOutcome<F>>>,
    resolved: HashMap<String, PullRequestRecord>,
    exhausted: bool,
    pages_consumed: u32,
    page_limit: u32,
}

impl<F: PageFetcher + 'static> LookaheadCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            pending: Some(spawn_fetch(fetcher)),
            resolved: HashMap::new(),
            exhausted: false,
            pages_consumed: 0,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Treat the listing as exhausted after `limit` pages (minimum 1).
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    /// Look up the pull request merged as `merge_commit_hash`.
    ///
    /// Returns `Ok(None)` once every page has been read without finding
    /// the key. A failed page fetch is returned as-is; after that, lookups
    /// that miss fail with [`GitHubError::FetchUnavailable`].
    pub async fn get(
        &mut self,
        merge_commit_hash: &str,
    ) -> Result<Option<PullRequestRecord>, GitHubError> {
        loop {
            if let Some(record) = self.resolved.get(merge_commit_hash) {
                return Ok(Some(record.clone()));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.advance().await?;
        }
    }

    /// Consume the in-flight page, start the next one, then merge.
    async fn advance(&mut self) -> Result<(), GitHubError> {
        let handle = self.pending.take().ok_or(GitHubError::FetchUnavailable)?;
        let (fetcher, page) = handle.await.map_err(GitHubError::FetchTask)?;
        let records = page?;
        self.pages_consumed += 1;

        if records.is_empty() {
            debug!(
                pages = self.pages_consumed,
                known = self.resolved.len(),
                "Pull request listing exhausted"
            );
            self.exhausted = true;
            return Ok(());
        }

        if self.pages_consumed >= self.page_limit {
            warn!(
                "Reached {}-page limit while scanning pull requests; remaining merges will be unmatched",
                self.page_limit
            );
            self.exhausted = true;
        } else {
            self.pending = Some(spawn_fetch(fetcher));
        }

        for record in records {
            if let Some(hash) = record.merge_commit_hash.clone() {
                self.resolved.insert(hash, record);
            }
        }

        Ok(())
    }

    /// Number of pages received so far, including the terminating empty one.
    pub fn pages_consumed(&self) -> u32 {
        self.pages_consumed
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of distinct merge commits resolved so far.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

impl<F: PageFetcher + 'static> Drop for LookaheadCache<F> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

fn spawn_fetch<F: PageFetcher + 'static>(mut fetcher: F) -> JoinHandle<FetchOutcome<F>> {
    tokio::spawn(async move {
        let page = fetcher.next().await;
        (fetcher, page)
    })
}
