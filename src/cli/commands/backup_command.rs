//! Backup command feature.
//!
//! This module owns and handles the "typefold backup" command behavior.

use crate::backup;
use crate::output::OutputMode;
use crate::progress;
use crate::theme::Theme;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Create a backup behind a spinner; shared with the organize command.
pub(crate) fn backup_with_progress(path: &Path, output_mode: OutputMode) -> anyhow::Result<PathBuf> {
    let spinner = if output_mode == OutputMode::Quiet {
        progress::create_hidden_bar()
    } else {
        progress::create_spinner("Creating backup...")
    };

    let result = backup::create_backup(path).context("Could not create backup");
    spinner.finish_and_clear();
    result
}

pub(crate) fn handle_backup(path: PathBuf, output_mode: OutputMode) -> anyhow::Result<()> {
    let archive = backup_with_progress(&path, output_mode)?;
    if output_mode != OutputMode::Quiet {
        println!(
            "{} Backup created at {}",
            Theme::success("OK"),
            archive.display()
        );
    }
    Ok(())
}
