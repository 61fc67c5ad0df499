//! Pull request records as seen by the changelog.

use octocrab::models::pulls::PullRequest;

/// A closed pull request, reduced to what classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    pub id: u64,
    /// `None` for PRs closed without merging.
    pub merge_commit_hash: Option<String>,
    pub labels: Vec<String>,
    pub link: String,
}

impl PullRequestRecord {
    /// Whether the record carries a label with exactly this name.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    /// Convert an octocrab pull request.
    pub fn from_octocrab(pr: PullRequest) -> Self {
        let merge_commit_hash = pr.merge_commit_sha.filter(|sha| !sha.is_empty());

        let labels = pr
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|l| l.name)
            .collect();

        let link = pr.html_url.map(|u| u.to_string()).unwrap_or_default();

        Self {
            id: pr.number,
            merge_commit_hash,
            labels,
            link,
        }
    }
}
