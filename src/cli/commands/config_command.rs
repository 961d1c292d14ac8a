//! Config command feature.
//!
//! This module owns and handles the "typefold config" command behavior.

use crate::config::Config;
use crate::theme::Theme;

pub(crate) fn handle_config(
    show: bool,
    reset: bool,
    min_files: Option<usize>,
    backup: Option<bool>,
) -> anyhow::Result<()> {
    if reset {
        Config::default().save()?;
        println!("{} Configuration reset to defaults.", Theme::success("OK"));
    }

    let updating = min_files.is_some() || backup.is_some();
    if updating {
        let mut config = Config::load();
        config.apply_cli_overrides(min_files, backup);
        config.save()?;
        println!("{} Configuration updated.", Theme::success("OK"));
    }

    // Bare `typefold config` shows the current values
    if show || !(reset || updating) {
        let config = Config::load();
        println!("{}", Theme::header("Current Configuration"));
        println!("{}", Theme::divider_bold(60));
        println!();
        println!("Organize:");
        println!("  Min files per folder: {}", config.organize.min_files);
        println!("  Create backup: {}", config.organize.create_backup);
        println!("  Pace: {} ms (0 = off)", config.organize.pace_ms);
        println!();
        if let Ok(path) = Config::config_path() {
            println!("Config file: {}", path.display());
        }
    }

    Ok(())
}
