//! herald - changelog generation from releases and labeled GitHub PRs.
//!
//! # Overview
//!
//! herald takes the releases listed by a release enumerator, matches each
//! merge commit to the pull request that produced it, sorts merges into
//! Breaking / Features / Fixes / Misc by PR label, and renders the result as
//! Markdown. Pull requests are looked up through a lookahead cache that
//! fetches GitHub's paged listing one page ahead of need.

pub mod changelog;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod manifest;
pub mod pipeline;
pub mod release;
pub mod staged;

// Re-export commonly used types
pub use changelog::{Bucket, ClassifiedRelease, Classifier};
pub use config::RunConfig;
pub use error::{ChangelogError, GitHubError, ManifestError, PipelineError, ReleaseError};
pub use github::{LookaheadCache, PageFetcher, PullRequestRecord, RepoRef};
pub use release::{Merge, Release};
