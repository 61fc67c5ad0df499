//! GitHub access: token discovery, repository identity, paged pull request
//! listing and the lookahead cache on top of it.

pub mod auth;
pub mod cache;
pub mod fetcher;
pub mod records;
pub mod remote;

pub use auth::get_github_token;
pub use cache::LookaheadCache;
pub use fetcher::{GitHubPageFetcher, PageFetcher};
pub use records::PullRequestRecord;
pub use remote::{RepoRef, detect_origin_repo, parse_github_remote};
