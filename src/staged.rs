//! Output files written to a temp file first and renamed into place later.
//!
//! Each [`StagedFile`] sits next to its target, so the final rename stays on
//! one filesystem. Dropping a staged file without persisting it deletes the
//! temp file and leaves the target untouched.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// New contents for `target`, held in a sibling temp file.
#[derive(Debug)]
pub struct StagedFile {
    target: PathBuf,
    file: NamedTempFile,
}

impl StagedFile {
    /// Write `contents` to a temp file in `target`'s directory.
    ///
    /// An existing target's permissions carry over to the replacement.
    pub fn new(target: &Path, contents: &[u8]) -> io::Result<Self> {
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents)?;
        file.flush()?;

        match fs::metadata(target) {
            Ok(meta) => file.as_file().set_permissions(meta.permissions())?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => set_default_permissions(&file)?,
            Err(e) => return Err(e),
        }

        Ok(Self {
            target: target.to_path_buf(),
            file,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the temp file over the target.
    pub fn persist(self) -> io::Result<PathBuf> {
        self.file.persist(&self.target).map_err(|e| e.error)?;
        Ok(self.target)
    }
}

#[cfg(unix)]
fn set_default_permissions(file: &NamedTempFile) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    // Temp files are created 0600
    file.as_file().set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &NamedTempFile) -> io::Result<()> {
    Ok(())
}
