//! herald - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use semver::Version;
use tracing_subscriber::EnvFilter;

use herald::changelog::generate_summary;
use herald::github::fetcher::MAX_PER_PAGE;
use herald::github::cache::DEFAULT_PAGE_LIMIT;
use herald::pipeline::run;
use herald::{Bucket, Classifier, RepoRef, RunConfig};

/// Generate a labeled changelog from releases and merged GitHub PRs.
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Generate a labeled changelog from releases and merged GitHub PRs")]
#[command(version)]
struct Cli {
    /// Release list in auto-changelog JSON format
    #[arg(long, default_value = "releases.json")]
    releases: PathBuf,

    /// Repository owner (defaults to the origin remote)
    #[arg(long, requires = "repo")]
    owner: Option<String>,

    /// Repository name (defaults to the origin remote)
    #[arg(long, requires = "owner")]
    repo: Option<String>,

    /// Path to changelog file
    #[arg(short = 'o', long, default_value = "CHANGELOG.md")]
    output: PathBuf,

    /// Version to write into manifests (defaults to the root manifest's)
    #[arg(long)]
    set_version: Option<Version>,

    /// Directory holding the root package.json / Cargo.toml
    #[arg(long, default_value = ".")]
    manifest_root: PathBuf,

    /// Pull requests per page (1-100)
    #[arg(long, default_value_t = MAX_PER_PAGE)]
    per_page: u8,

    /// Stop scanning pull requests after this many pages
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    max_pages: u32,

    /// Label marking breaking changes
    #[arg(long, default_value = "breaking")]
    breaking_label: String,

    /// Label marking features
    #[arg(long, default_value = "enhancement")]
    feature_label: String,

    /// Label marking fixes
    #[arg(long, default_value = "bug")]
    fix_label: String,

    /// Skip manifest version updates
    #[arg(long)]
    no_manifests: bool,

    /// Add the written changelog and manifests to the git index
    #[arg(long, conflicts_with = "dry_run")]
    stage: bool,

    /// Dry run - print changelog without writing
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let repo = match (self.owner, self.repo) {
            (Some(owner), Some(name)) => Some(RepoRef::new(owner, name)),
            _ => None,
        };

        let classifier = Classifier::default()
            .with_label(Bucket::Breaking, self.breaking_label)
            .with_label(Bucket::Feature, self.feature_label)
            .with_label(Bucket::Fix, self.fix_label);

        RunConfig {
            releases: self.releases,
            repo,
            output: self.output,
            set_version: self.set_version,
            manifest_root: self.manifest_root,
            per_page: self.per_page,
            max_pages: self.max_pages,
            update_manifests: !self.no_manifests,
            stage: self.stage,
            dry_run: self.dry_run,
            classifier,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("HERALD_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config();
    let outcome = run(&config)
        .await
        .context("Failed to generate changelog")?;

    if !outcome.written {
        println!("{}", outcome.changelog);
        for update in &outcome.manifest_updates {
            println!("Would update {} ({})", update.path.display(), update.kind);
        }
        return Ok(());
    }

    println!(
        "✓ {} written to {}",
        generate_summary(&outcome.releases),
        config.output.display()
    );
    if let Some(version) = &outcome.version {
        for update in &outcome.manifest_updates {
            println!("✓ {} set to {}", update.path.display(), version);
        }
    }
    if !outcome.staged.is_empty() {
        println!("✓ Staged {} file(s) in git", outcome.staged.len());
    }

    Ok(())
}
