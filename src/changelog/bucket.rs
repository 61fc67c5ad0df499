//! Changelog buckets and the label classifier that fills them.

use crate::github::PullRequestRecord;

/// Changelog buckets, declared in priority order.
///
/// The derived `Ord` is that priority: `Breaking < Feature < Fix < Misc`
/// sorts the most important section first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Breaking,
    Feature,
    Fix,
    Misc,
}

impl Bucket {
    /// Every bucket, highest priority first.
    pub const ALL: [Bucket; 4] = [Bucket::Breaking, Bucket::Feature, Bucket::Fix, Bucket::Misc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breaking => "breaking",
            Self::Feature => "feature",
            Self::Fix => "fix",
            Self::Misc => "misc",
        }
    }

    /// Section heading used in the rendered changelog.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Breaking => "**Breaking**",
            Self::Feature => "Features",
            Self::Fix => "Fixes",
            Self::Misc => "Misc",
        }
    }

    /// The label that selects this bucket by default. `Misc` has none.
    pub fn default_label(&self) -> Option<&'static str> {
        match self {
            Self::Breaking => Some("breaking"),
            Self::Feature => Some("enhancement"),
            Self::Fix => Some("bug"),
            Self::Misc => None,
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assigns each merge to exactly one bucket.
///
/// Rules are tried in bucket priority order and the first label match wins.
/// Anything unmatched, including merges with no pull request, lands in
/// [`Bucket::Misc`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(Bucket, String)>,
}

impl Default for Classifier {
    fn default() -> Self {
        let rules = Bucket::ALL
            .iter()
            .filter_map(|b| b.default_label().map(|l| (*b, l.to_string())))
            .collect();
        Self { rules }
    }
}

impl Classifier {
    /// Replace the label a bucket matches on. `Misc` cannot be overridden.
    pub fn with_label(mut self, bucket: Bucket, label: impl Into<String>) -> Self {
        if let Some(rule) = self.rules.iter_mut().find(|(b, _)| *b == bucket) {
            rule.1 = label.into();
        }
        self
    }

    pub fn classify(&self, record: Option<&PullRequestRecord>) -> Bucket {
        let Some(record) = record else {
            return Bucket::Misc;
        };

        self.rules
            .iter()
            .find(|(_, label)| record.has_label(label))
            .map(|(bucket, _)| *bucket)
            .unwrap_or(Bucket::Misc)
    }
}
