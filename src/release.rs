//! Releases and their merges, as produced by the release enumerator.
//!
//! The input is the JSON emitted by `auto-changelog --template json`: an
//! array of releases, newest first, each listing the merge commits that
//! landed in it.

use std::path::Path;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use crate::error::ReleaseError;

/// A tagged release and the merges it contains, in enumerator order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub title: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    /// Compare link covering the release ("Full changelog").
    #[serde(rename = "href", default)]
    pub source_ref: Option<String>,
    #[serde(default)]
    pub merges: Vec<Merge>,
}

/// A merge commit that closed a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMerge")]
pub struct Merge {
    pub commit_hash: String,
    pub message: String,
    pub target_id: u64,
    pub link: String,
}

#[derive(Deserialize)]
struct RawMerge {
    id: u64,
    message: String,
    href: String,
    commit: RawCommit,
}

#[derive(Deserialize)]
struct RawCommit {
    hash: String,
}

impl From<RawMerge> for Merge {
    fn from(raw: RawMerge) -> Self {
        Self {
            commit_hash: raw.commit.hash,
            message: raw.message,
            target_id: raw.id,
            link: raw.href,
        }
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&s) {
        return Ok(ts.date_naive());
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|e| serde::de::Error::custom(format!("invalid release date '{}': {}", s, e)))
}

/// Parse releases from enumerator JSON.
pub fn parse_releases(json: &str) -> Result<Vec<Release>, ReleaseError> {
    serde_json::from_str(json).map_err(ReleaseError::ParseFailed)
}

/// Read and parse releases from a file.
pub fn read_releases(path: &Path) -> Result<Vec<Release>, ReleaseError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReleaseError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_releases(&content)
}
