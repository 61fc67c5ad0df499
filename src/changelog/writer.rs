//! Staging the rendered changelog, and the run summary.

use std::path::Path;

use crate::error::ChangelogError;
use crate::staged::StagedFile;

use super::bucket::Bucket;
use super::format::ClassifiedRelease;

/// Stage `content` for `path` without touching the existing changelog.
///
/// Nothing is visible at `path` until the returned file is persisted.
pub fn stage_changelog(path: &Path, content: &str) -> Result<StagedFile, ChangelogError> {
    StagedFile::new(path, content.as_bytes()).map_err(ChangelogError::WriteFailed)
}

/// One-line summary of what was classified.
pub fn generate_summary(releases: &[ClassifiedRelease]) -> String {
    let total: usize = releases.iter().map(ClassifiedRelease::merge_count).sum();
    let release_word = if releases.len() == 1 { "release" } else { "releases" };
    if total == 0 {
        return format!("{} {}, no merges", releases.len(), release_word);
    }

    let details: Vec<String> = Bucket::ALL
        .iter()
        .map(|b| {
            let count: usize = releases.iter().map(|r| r.merges_in(*b).len()).sum();
            (b, count)
        })
        .filter(|(_, count)| *count > 0)
        .map(|(b, count)| format!("{}: {}", b, count))
        .collect();

    let merge_word = if total == 1 { "merge" } else { "merges" };

    format!(
        "{} {} across {} {} ({})",
        total,
        merge_word,
        releases.len(),
        release_word,
        details.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::{Merge, Release};
    use chrono::NaiveDate;

    fn classified(buckets: &[Bucket]) -> ClassifiedRelease {
        let release = Release {
            title: "v1.0.0".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            source_ref: None,
            merges: vec![],
        };
        let mut r = ClassifiedRelease::new(&release, "link");
        for (i, b) in buckets.iter().enumerate() {
            r.push(
                *b,
                Merge {
                    commit_hash: format!("h{}", i),
                    message: "m".to_string(),
                    target_id: i as u64,
                    link: String::new(),
                },
            );
        }
        r
    }

    #[test]
    fn test_staged_changelog_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        std::fs::write(&path, "old").unwrap();

        let staged = stage_changelog(&path, "# new\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
        staged.persist().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# new\n");
        // No temp files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_stage_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("CHANGELOG.md");
        assert!(matches!(
            stage_changelog(&path, "x"),
            Err(ChangelogError::WriteFailed(_))
        ));
    }

    #[test]
    fn test_generate_summary() {
        let releases = vec![
            classified(&[Bucket::Fix, Bucket::Fix]),
            classified(&[Bucket::Breaking]),
        ];
        let summary = generate_summary(&releases);
        assert_eq!(summary, "3 merges across 2 releases (breaking: 1, fix: 2)");
    }

    #[test]
    fn test_generate_summary_empty() {
        assert_eq!(generate_summary(&[classified(&[])]), "1 release, no merges");
    }
}
