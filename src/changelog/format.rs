//! Classified releases and their Markdown rendering.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::release::{Merge, Release};

use super::bucket::Bucket;

/// A release with its merges sorted into buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRelease {
    pub title: String,
    pub date: NaiveDate,
    /// Release page for the tag.
    pub link: String,
    /// Compare link for the "Full changelog" reference.
    pub source_ref: Option<String>,
    pub buckets: BTreeMap<Bucket, Vec<Merge>>,
}

impl ClassifiedRelease {
    /// Start an empty classification for `release`.
    pub fn new(release: &Release, link: impl Into<String>) -> Self {
        Self {
            title: release.title.clone(),
            date: release.date,
            link: link.into(),
            source_ref: release.source_ref.clone(),
            buckets: BTreeMap::new(),
        }
    }

    /// Append a merge to a bucket, keeping arrival order.
    pub fn push(&mut self, bucket: Bucket, merge: Merge) {
        self.buckets.entry(bucket).or_default().push(merge);
    }

    pub fn merges_in(&self, bucket: Bucket) -> &[Merge] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Buckets with at least one merge, highest priority first.
    pub fn sections(&self) -> impl Iterator<Item = (Bucket, &[Merge])> {
        self.buckets
            .iter()
            .filter(|(_, merges)| !merges.is_empty())
            .map(|(bucket, merges)| (*bucket, merges.as_slice()))
    }

    pub fn merge_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Render one entry line.
fn format_entry(merge: &Merge) -> String {
    format!("- {} [#{}]({})", merge.message, merge.target_id, merge.link)
}

fn format_section(bucket: Bucket, merges: &[Merge]) -> String {
    let lines: Vec<String> = merges.iter().map(format_entry).collect();
    format!("{}\n\n{}\n", bucket.heading(), lines.join("\n"))
}

/// Render a single release.
///
/// Heading, date line and one section per non-empty bucket in priority
/// order. Pure: identical input gives identical output.
pub fn format_release(release: &ClassifiedRelease) -> String {
    let date = release.date.format("%-d %B %Y");
    let date_line = match &release.source_ref {
        Some(href) => format!("_{}_ ([Full changelog]({}))", date, href),
        None => format!("_{}_", date),
    };

    let sections: Vec<String> = release
        .sections()
        .map(|(bucket, merges)| format_section(bucket, merges))
        .collect();

    format!(
        "# [{}]({})\n\n{}\n\n{}\n",
        release.title,
        release.link,
        date_line,
        sections.join("\n")
    )
}

/// Render every release in input order.
pub fn format_changelog(releases: &[ClassifiedRelease]) -> String {
    releases.iter().map(format_release).collect()
}
