//! Adding written files to the git index.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{debug, warn};

/// Add `paths` to the index of the repository containing `repo_path`.
///
/// Paths outside the work tree are skipped with a warning. Returns the
/// repository-relative paths that were added.
pub fn add_to_index(repo_path: &Path, paths: &[PathBuf]) -> Result<Vec<PathBuf>, git2::Error> {
    let repo = Repository::discover(repo_path)?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| git2::Error::from_str("cannot stage files in a bare repository"))?;
    let workdir = workdir
        .canonicalize()
        .map_err(|e| git2::Error::from_str(&format!("cannot resolve work tree: {}", e)))?;

    let mut index = repo.index()?;
    let mut added = Vec::with_capacity(paths.len());

    for path in paths {
        let Some(relative) = relative_to(&workdir, path) else {
            warn!(path = %path.display(), "Not inside the git work tree; leaving unstaged");
            continue;
        };
        index.add_path(&relative)?;
        debug!(path = %relative.display(), "Staged");
        added.push(relative);
    }

    index.write()?;
    Ok(added)
}

fn relative_to(workdir: &Path, path: &Path) -> Option<PathBuf> {
    let absolute = path.canonicalize().ok()?;
    absolute.strip_prefix(workdir).ok().map(Path::to_path_buf)
}
