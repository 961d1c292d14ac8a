//! Directory inventory: groups the direct children of a folder by extension.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Filenames sharing one lowercase extension, in scan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionGroup {
    pub extension: String,
    pub files: Vec<String>,
}

/// Lowercase extension of a filename, without the dot.
///
/// Everything after the last `.`, so `.gitignore` has extension `gitignore`.
/// `None` for names without a dot and names ending in `.`.
pub fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_lowercase())
}

/// Scan a directory's immediate regular files and group them by extension.
///
/// A path that is not an existing directory yields an empty result; callers
/// that care check existence themselves. Entries are visited in file-name
/// order so two scans of the same directory state always agree.
pub fn scan(dir: &Path) -> Vec<ExtensionGroup> {
    let mut groups: Vec<ExtensionGroup> = Vec::new();

    if !dir.is_dir() {
        return groups;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot list directory");
            return groups;
        }
    };

    let mut names: Vec<String> = Vec::new();
    for entry in entries.flatten() {
        // Follows symlinks: a link to a file counts as a file
        let is_file = fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!(name = ?raw, "skipping non UTF-8 file name"),
        }
    }
    names.sort();

    for name in names {
        let Some(ext) = extension_of(&name) else {
            continue;
        };
        match groups.iter_mut().find(|g| g.extension == ext) {
            Some(group) => group.files.push(name),
            None => groups.push(ExtensionGroup {
                extension: ext,
                files: vec![name],
            }),
        }
    }

    debug!(dir = %dir.display(), groups = groups.len(), "scan complete");
    groups
}
