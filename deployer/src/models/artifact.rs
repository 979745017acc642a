//! Artifact models

use crate::filesys::file::File;

const SNAPSHOT: &str = "SNAPSHOT";

/// A packaged application version to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Application name in the console repository
    pub name: String,

    /// Version label
    pub version: String,

    /// Packaged file
    pub file: File,
}

impl Artifact {
    pub fn new(name: impl Into<String>, version: impl Into<String>, file: File) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            file,
        }
    }

    /// Snapshot versions are mutable and replaced on every upload
    pub fn is_snapshot(&self) -> bool {
        is_snapshot_version(&self.version)
    }
}

/// Whether a version label denotes a snapshot
pub fn is_snapshot_version(version: &str) -> bool {
    version.contains(SNAPSHOT)
}
