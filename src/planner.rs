//! Threshold planning and read-only previews.
//!
//! Both the preview and the mover derive their work from [`plan`], so what the
//! user sees is exactly what gets executed for the same directory state.

use crate::error::OrganizeError;
use crate::scanner::{self, ExtensionGroup};
use serde::Serialize;
use std::path::Path;

pub const DEFAULT_MIN_FILES: usize = 2;
pub const MIN_THRESHOLD: usize = 1;
pub const MAX_THRESHOLD: usize = 50;

/// Destination folder name for an extension, e.g. `pdf` -> `PDF Files`.
pub fn folder_name(extension: &str) -> String {
    format!("{} Files", extension.to_uppercase())
}

/// Clamp a user supplied threshold into the accepted range.
pub fn clamp_threshold(threshold: usize) -> usize {
    threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedGroup {
    pub extension: String,
    pub folder_name: String,
    pub files: Vec<String>,
    /// `files.len() >= threshold`
    pub included: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationPlan {
    pub threshold: usize,
    pub groups: Vec<PlannedGroup>,
}

impl OrganizationPlan {
    /// Every file with an extension, included or not.
    pub fn total_files(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }

    pub fn type_count(&self) -> usize {
        self.groups.len()
    }

    pub fn folders_to_create(&self) -> usize {
        self.included().count()
    }

    /// Files that meet the threshold and will be moved.
    pub fn files_to_move(&self) -> usize {
        self.included().map(|g| g.files.len()).sum()
    }

    pub fn included(&self) -> impl Iterator<Item = &PlannedGroup> {
        self.groups.iter().filter(|g| g.included)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &PlannedGroup> {
        self.groups.iter().filter(|g| !g.included)
    }
}

/// Mark each group as included or excluded for `threshold`.
///
/// Pure: no I/O. Group and file order are carried over from the scan.
pub fn plan(groups: &[ExtensionGroup], threshold: usize) -> OrganizationPlan {
    let groups = groups
        .iter()
        .map(|group| PlannedGroup {
            extension: group.extension.clone(),
            folder_name: folder_name(&group.extension),
            files: group.files.clone(),
            included: group.files.len() >= threshold,
        })
        .collect();

    OrganizationPlan { threshold, groups }
}

/// What `organize` would do with a target, computed without touching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preview {
    SingleFile {
        file_name: String,
        folder_name: String,
    },
    Directory {
        name: String,
        plan: OrganizationPlan,
    },
}

pub fn preview(target: &Path, threshold: usize) -> Result<Preview, OrganizeError> {
    if target.is_file() {
        let file_name = display_name(target);
        let extension =
            scanner::extension_of(&file_name).ok_or_else(|| OrganizeError::UnsupportedFile {
                path: target.to_path_buf(),
            })?;
        Ok(Preview::SingleFile {
            file_name,
            folder_name: folder_name(&extension),
        })
    } else if target.is_dir() {
        let groups = scanner::scan(target);
        Ok(Preview::Directory {
            name: display_name(target),
            plan: plan(&groups, threshold),
        })
    } else {
        Err(OrganizeError::InvalidTarget {
            path: target.to_path_buf(),
        })
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
