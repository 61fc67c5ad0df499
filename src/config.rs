//! Run configuration, derived from CLI flags.

use std::path::PathBuf;

use semver::Version;

use crate::changelog::Classifier;
use crate::github::RepoRef;
use crate::github::cache::DEFAULT_PAGE_LIMIT;
use crate::github::fetcher::MAX_PER_PAGE;

/// Everything one changelog run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// JSON file produced by the release enumerator.
    pub releases: PathBuf,
    /// Target repository; detected from the `origin` remote when `None`.
    pub repo: Option<RepoRef>,
    pub output: PathBuf,
    /// Version to stamp into manifests. Falls back to the root manifest's.
    pub set_version: Option<Version>,
    pub manifest_root: PathBuf,
    pub per_page: u8,
    pub max_pages: u32,
    pub update_manifests: bool,
    /// Add the written files to the git index.
    pub stage: bool,
    pub dry_run: bool,
    pub classifier: Classifier,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            releases: PathBuf::from("releases.json"),
            repo: None,
            output: PathBuf::from("CHANGELOG.md"),
            set_version: None,
            manifest_root: PathBuf::from("."),
            per_page: MAX_PER_PAGE,
            max_pages: DEFAULT_PAGE_LIMIT,
            update_manifests: true,
            stage: false,
            dry_run: false,
            classifier: Classifier::default(),
        }
    }
}
