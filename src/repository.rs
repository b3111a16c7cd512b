use std::path::{Path, PathBuf};

/// A directory holding recipe subdirectories.
///
/// `source` is the logical reference the repository was requested with (a
/// URL or a path); `dir` is where its content lives locally. Acquisition and
/// caching happen upstream; by the time a `Repository` exists, `dir` is
/// readable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    source: String,
    dir: PathBuf,
}

impl Repository {
    pub fn new(source: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dir: dir.into(),
        }
    }

    /// Repository backed by a local directory, referenced by its own path.
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            source: dir.display().to_string(),
            dir,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
