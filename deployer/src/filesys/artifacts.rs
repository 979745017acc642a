//! Artifact file resolution
//!
//! The configured file location is either a plain path or a path whose
//! final component contains `*` wildcards (e.g. `target/*.zip`). Relative
//! locations are resolved against the workspace directory.

use std::path::Path;

use tracing::debug;

use crate::errors::DeployError;
use crate::filesys::dir::Dir;
use crate::filesys::file::File;

/// Resolve a file location into the list of artifact files to deploy
pub async fn resolve_artifacts(workspace: &Path, location: &str) -> Result<Vec<File>, DeployError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(DeployError::ConfigError("Artifact file location is empty".to_string()));
    }

    let full = workspace.join(location);
    let pattern = full
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parent = full.parent().unwrap_or(workspace);
    if parent.to_string_lossy().contains('*') {
        return Err(DeployError::ConfigError(format!(
            "Wildcards are only supported in the file name: {}",
            location
        )));
    }

    let files = if pattern.contains('*') {
        let dir = Dir::new(parent);
        if !dir.exists().await {
            Vec::new()
        } else {
            dir.list_files()
                .await?
                .into_iter()
                .map(File::new)
                .filter(|f| matches_wildcard(&pattern, &f.file_name()))
                .collect()
        }
    } else {
        let file = File::new(full);
        if file.exists().await {
            vec![file]
        } else {
            Vec::new()
        }
    };

    if files.is_empty() {
        return Err(DeployError::NotFound(format!(
            "No artifacts found for deployment at {}",
            location
        )));
    }

    debug!("Resolved {} artifact(s) for {}", files.len(), location);
    Ok(files)
}

/// Match a file name against a pattern where `*` matches any run of characters
pub fn matches_wildcard(pattern: &str, name: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == name;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if name.len() < first.len() + last.len() || !name.starts_with(first) || !name.ends_with(last) {
        return false;
    }

    let mut rest = &name[first.len()..name.len() - last.len()];
    for middle in &parts[1..parts.len() - 1] {
        match rest.find(middle) {
            Some(idx) => rest = &rest[idx + middle.len()..],
            None => return false,
        }
    }
    true
}
