//! Collision-free destination names.
//!
//! `report.pdf` becomes `report_1.pdf`, `report_2.pdf`, ... until a free name
//! is found. The probe is not atomic against other writers; the move itself
//! refuses to overwrite, so a lost race surfaces as a move failure.

use std::path::Path;

fn is_taken(path: &Path) -> bool {
    // symlink_metadata so a dangling link still counts as taken
    path.symlink_metadata().is_ok()
}

/// Split a file name into the part before the extension and the extension.
fn split_name(file_name: &str) -> (&str, Option<&str>) {
    let path = Path::new(file_name);
    let stem = path.file_stem().and_then(|s| s.to_str());
    let ext = path.extension().and_then(|e| e.to_str());
    match (stem, ext) {
        (Some(stem), Some(ext)) => (stem, Some(ext)),
        _ => (file_name, None),
    }
}

pub(crate) fn suffixed_name(file_name: &str, counter: u64) -> String {
    match split_name(file_name) {
        (stem, Some(ext)) => format!("{}_{}.{}", stem, counter, ext),
        (stem, None) => format!("{}_{}", stem, counter),
    }
}

/// First free name for `file_name` inside `folder`, probing `_1`, `_2`, ...
pub fn resolve_file_name(folder: &Path, file_name: &str) -> String {
    if !is_taken(&folder.join(file_name)) {
        return file_name.to_string();
    }

    let mut counter = 1u64;
    loop {
        let candidate = suffixed_name(file_name, counter);
        if !is_taken(&folder.join(&candidate)) {
            return candidate;
        }
        counter += 1;
    }
}
