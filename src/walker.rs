use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::UploadError;
use crate::glob::GlobPattern;

/// A regular file under the upload root selected by an include pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// `/`-separated path relative to the root, also the untransformed key
    pub relative_path: String,
    /// Location on disk
    pub path: PathBuf,
}

/// Enumerate regular files under `root` matching any include pattern.
///
/// Files are grouped by the first pattern that selects them, in pattern
/// order, and sorted by path within a group. A file matched by several
/// patterns is listed once.
pub fn list_files(root: &Path, includes: &[GlobPattern]) -> Result<Vec<CandidateFile>, UploadError> {
    let metadata = std::fs::metadata(root).map_err(|e| UploadError::Enumeration {
        root: root.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(UploadError::Enumeration {
            root: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let files = walk_regular_files(root);
    debug!("Found {} files under {}", files.len(), root.display());

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for pattern in includes {
        for file in &files {
            if pattern.matches(&file.relative_path) && seen.insert(file.relative_path.clone()) {
                candidates.push(file.clone());
            }
        }
    }

    Ok(candidates)
}

fn walk_regular_files(root: &Path) -> Vec<CandidateFile> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !is_regular_file(&entry) {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };

        match to_key(relative) {
            Some(relative_path) => files.push(CandidateFile {
                relative_path,
                path: entry.path().to_path_buf(),
            }),
            None => warn!("Skipping non UTF-8 path: {}", entry.path().display()),
        }
    }

    files
}

/// Regular files, including symlinks whose target is a regular file.
/// Symlinked directories are not descended into.
fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    match entry.path().metadata() {
        Ok(metadata) => metadata.is_file(),
        Err(e) => {
            warn!("Skipping dangling symlink {}: {}", entry.path().display(), e);
            false
        }
    }
}

/// Join path components with `/` regardless of platform
fn to_key(relative: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    parts.map(|parts| parts.join("/"))
}
