//! Preview command feature.
//!
//! This module owns and handles the "typefold preview" command behavior.

use crate::config::Config;
use crate::output::{self, OutputMode};
use crate::planner;
use std::path::PathBuf;

pub(crate) fn handle_preview(
    path: PathBuf,
    min_files: Option<usize>,
    json: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut config = Config::load();
    config.apply_cli_overrides(min_files, None);

    let preview = planner::preview(&path, config.organize.min_files)?;

    if json {
        output::print_json(&preview)?;
    } else {
        output::print_preview(&preview, output_mode);
    }

    Ok(())
}
