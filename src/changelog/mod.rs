//! Classification, rendering and writing of the changelog.

pub mod bucket;
pub mod format;
pub mod writer;

pub use bucket::{Bucket, Classifier};
pub use format::{ClassifiedRelease, format_changelog, format_release};
pub use writer::{generate_summary, stage_changelog};
