//! The changelog run: enumerate, resolve, classify, format, write.
//!
//! Output is all-or-nothing. Every fallible step that does not write runs
//! first; the changelog and manifests are only written once all of them
//! have succeeded.

use std::path::{Path, PathBuf};

use semver::Version;
use tracing::{debug, info, warn};

use crate::changelog::{ClassifiedRelease, Classifier, format_changelog, stage_changelog};
use crate::config::RunConfig;
use crate::error::{GitHubError, PipelineError};
use crate::github::{
    GitHubPageFetcher, LookaheadCache, PageFetcher, RepoRef, detect_origin_repo, get_github_token,
};
use crate::git::add_to_index;
use crate::manifest::{ManifestUpdate, detect_version, plan_manifest_updates, stage_manifest_updates};
use crate::release::{Release, read_releases};

/// What a run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub changelog: String,
    pub releases: Vec<ClassifiedRelease>,
    pub version: Option<Version>,
    pub manifest_updates: Vec<ManifestUpdate>,
    /// False for dry runs.
    pub written: bool,
    /// Repository-relative paths added to the git index.
    pub staged: Vec<PathBuf>,
}

/// Resolve every merge through `cache` and sort it into a bucket.
///
/// The cache lives for this call only and is dropped with it.
pub async fn classify_releases<F: PageFetcher + 'static>(
    releases: &[Release],
    mut cache: LookaheadCache<F>,
    classifier: &Classifier,
    repo: &RepoRef,
) -> Result<Vec<ClassifiedRelease>, GitHubError> {
    let mut classified = Vec::with_capacity(releases.len());

    for release in releases {
        let mut row = ClassifiedRelease::new(release, repo.release_url(&release.title));

        for merge in &release.merges {
            let record = cache.get(&merge.commit_hash).await?;
            let bucket = classifier.classify(record.as_ref());
            debug!(
                hash = %merge.commit_hash,
                id = merge.target_id,
                %bucket,
                matched = record.is_some(),
                "Classified merge"
            );
            row.push(bucket, merge.clone());
        }

        info!(
            title = %release.title,
            merges = release.merges.len(),
            "Classified release"
        );
        classified.push(row);
    }

    debug!(
        pages = cache.pages_consumed(),
        known = cache.len(),
        exhausted = cache.is_exhausted(),
        "Pull request cache at end of run"
    );

    Ok(classified)
}

/// Classify and render in one step.
pub async fn build_changelog<F: PageFetcher + 'static>(
    releases: &[Release],
    cache: LookaheadCache<F>,
    classifier: &Classifier,
    repo: &RepoRef,
) -> Result<String, GitHubError> {
    let classified = classify_releases(releases, cache, classifier, repo).await?;
    Ok(format_changelog(&classified))
}

/// Run against GitHub, with the token and repository discovered from the
/// environment when not configured.
pub async fn run(config: &RunConfig) -> Result<RunOutcome, PipelineError> {
    let repo = match &config.repo {
        Some(repo) => repo.clone(),
        None => detect_origin_repo(&config.manifest_root)?,
    };
    let token = get_github_token()?;
    let fetcher = GitHubPageFetcher::from_token(&token, repo.clone())?.per_page(config.per_page);

    run_with_fetcher(config, &repo, fetcher).await
}

/// Run with an explicit page source.
pub async fn run_with_fetcher<F: PageFetcher + 'static>(
    config: &RunConfig,
    repo: &RepoRef,
    fetcher: F,
) -> Result<RunOutcome, PipelineError> {
    // ── Stage 1: Enumerate releases ──
    let releases = read_releases(&config.releases)?;
    info!(count = releases.len(), %repo, "Loaded releases");

    // ── Stage 2: Resolve, classify, accumulate ──
    let cache = LookaheadCache::new(fetcher).with_page_limit(config.max_pages);
    let classified = classify_releases(&releases, cache, &config.classifier, repo).await?;

    // ── Stage 3: Format ──
    let changelog = format_changelog(&classified);

    // ── Stage 4: Plan manifest updates ──
    let version = match &config.set_version {
        Some(v) => Some(v.clone()),
        None => detect_version(&config.manifest_root)?,
    };

    let manifest_updates = match (&version, config.update_manifests) {
        (Some(v), true) => plan_manifest_updates(&config.manifest_root, v)?,
        (None, true) => {
            warn!("No version configured or found in manifests; skipping manifest updates");
            Vec::new()
        }
        (_, false) => Vec::new(),
    };

    // ── Stage 5: Write ──
    if config.dry_run {
        return Ok(RunOutcome {
            changelog,
            releases: classified,
            version,
            manifest_updates,
            written: false,
            staged: Vec::new(),
        });
    }

    let written = write_outputs(&config.output, &changelog, &manifest_updates)?;
    info!(
        path = %config.output.display(),
        manifests = manifest_updates.len(),
        "Wrote changelog"
    );

    // ── Stage 6: Add to the git index ──
    let staged = if config.stage {
        add_to_index(&config.manifest_root, &written).map_err(PipelineError::StagingFailed)?
    } else {
        Vec::new()
    };

    Ok(RunOutcome {
        changelog,
        releases: classified,
        version,
        manifest_updates,
        written: true,
        staged,
    })
}

/// Write the changelog and every manifest update, or none of them.
///
/// All outputs are staged to temp files first; if any of those writes
/// fails, the staged files are dropped and nothing on disk changes. Only
/// then are they renamed into place. Returns the written paths.
pub fn write_outputs(
    changelog_path: &Path,
    changelog: &str,
    manifest_updates: &[ManifestUpdate],
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut staged = vec![stage_changelog(changelog_path, changelog)?];
    staged.extend(stage_manifest_updates(manifest_updates)?);

    let mut written = Vec::with_capacity(staged.len());
    for file in staged {
        let path = file.target().to_path_buf();
        let path = file
            .persist()
            .map_err(|source| PipelineError::PersistFailed { path, source })?;
        written.push(path);
    }
    Ok(written)
}
