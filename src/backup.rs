//! Zip snapshot of a file or folder, written next to it before organizing.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{self, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Snapshot `path` using the current local time in the archive name.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    create_backup_at(path, Local::now())
}

/// Snapshot `path` into `<name>_backup_<timestamp>.zip` beside it.
///
/// A file is stored under its own name. A folder is stored recursively with
/// entries relative to its parent, so they all start with `<folder>/`.
pub fn create_backup_at(path: &Path, when: DateTime<Local>) -> Result<PathBuf> {
    let stamp = when.format(TIMESTAMP_FORMAT).to_string();
    // Empty for bare relative names, which keeps strip_prefix working
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let archive_path = if path.is_file() {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let archive_path = parent.join(format!("{}_backup_{}.zip", stem, stamp));
        let entry = entry_name(path, parent)?;
        write_archive(&archive_path, &[(path.to_path_buf(), entry)])?;
        archive_path
    } else if path.is_dir() {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .context("Cannot back up a folder without a name")?;
        let archive_path = parent.join(format!("{}_backup_{}.zip", name, stamp));
        let entries = collect_entries(path, parent)?;
        write_archive(&archive_path, &entries)?;
        archive_path
    } else {
        bail!("Cannot back up {}: no such file or folder", path.display());
    };

    info!(archive = %archive_path.display(), "backup created");
    Ok(archive_path)
}

/// Archive entry name: path relative to `base`, `/` separated.
fn entry_name(path: &Path, base: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(base)
        .with_context(|| format!("{} is outside {}", path.display(), base.display()))?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

fn collect_entries(dir: &Path, base: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if entry.file_type().is_file() {
            let name = entry_name(entry.path(), base)?;
            entries.push((entry.path().to_path_buf(), name));
        }
    }
    Ok(entries)
}

fn write_archive(archive_path: &Path, entries: &[(PathBuf, String)]) -> Result<()> {
    let file = File::create(archive_path)
        .with_context(|| format!("Failed to create backup {}", archive_path.display()))?;

    let written = fill_archive(ZipWriter::new(BufWriter::new(file)), entries);
    if written.is_err() {
        let _ = fs::remove_file(archive_path);
    }
    written
}

fn fill_archive<W: Write + Seek>(mut zip: ZipWriter<W>, entries: &[(PathBuf, String)]) -> Result<()> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(true);

    for (source, name) in entries {
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add {} to backup", name))?;
        let mut reader =
            File::open(source).with_context(|| format!("Failed to read {}", source.display()))?;
        io::copy(&mut reader, &mut zip)
            .with_context(|| format!("Failed to compress {}", source.display()))?;
    }

    let mut writer = zip.finish().context("Failed to finish backup archive")?;
    writer.flush().context("Failed to write backup archive")?;
    Ok(())
}
