//! Organize command feature.
//!
//! This module owns and handles the "typefold organize" command behavior.

use super::backup_command::backup_with_progress;
use crate::cancel::CancelToken;
use crate::cli::confirm;
use crate::config::Config;
use crate::events::OrganizeEvent;
use crate::mover::{OrganizeRequest, Outcome};
use crate::output::{self, OutputMode};
use crate::planner::{self, Preview};
use crate::progress;
use crate::theme::Theme;
use crate::worker::{OrganizeWorker, Session};
use anyhow::bail;
use std::path::PathBuf;
use tracing::warn;

fn install_ctrlc_handler(token: CancelToken) {
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!(error = %e, "could not install Ctrl-C handler; cancellation disabled");
    }
}

pub(crate) fn handle_organize(
    path: PathBuf,
    min_files: Option<usize>,
    backup: Option<bool>,
    yes: bool,
    no_pace: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut config = Config::load();
    config.apply_cli_overrides(min_files, backup);
    let threshold = config.organize.min_files;

    let preview = planner::preview(&path, threshold)?;
    output::print_preview(&preview, output_mode);

    if let Preview::Directory { plan, .. } = &preview {
        if plan.files_to_move() == 0 {
            if output_mode != OutputMode::Quiet {
                println!("{}", Theme::muted(&Outcome::NothingToOrganize.message()));
            }
            return Ok(());
        }
    }

    if !yes {
        let prompt = format!(
            "Organize {}? This action will move files.",
            path.display()
        );
        if !confirm(&prompt)? {
            println!("{}", Theme::muted("Cancelled."));
            return Ok(());
        }
    }

    if config.organize.create_backup {
        let archive = backup_with_progress(&path, output_mode)?;
        if output_mode != OutputMode::Quiet {
            println!("Backup created at {}", archive.display());
        }
    }

    let request = OrganizeRequest {
        target: path,
        min_files: threshold,
        pace: if no_pace { None } else { config.pace() },
    };

    let worker = OrganizeWorker::new(request);
    install_ctrlc_handler(worker.cancel_token());
    let mut session = Session::new();
    let events = session.start_worker(worker)?;

    let bar = if output_mode == OutputMode::Quiet {
        progress::create_hidden_bar()
    } else {
        progress::create_percent_bar("Organizing...")
    };
    let verbose = matches!(output_mode, OutputMode::Verbose | OutputMode::VeryVerbose);

    let mut failure = None;
    for event in events {
        match event {
            OrganizeEvent::Progress(percent) => bar.set_position(u64::from(percent)),
            OrganizeEvent::Status(message) => {
                if verbose {
                    bar.println(&message);
                }
                bar.set_message(message);
            }
            OrganizeEvent::Completed { message, moved } => {
                bar.finish_and_clear();
                if output_mode != OutputMode::Quiet {
                    println!("{} {} ({} moved)", Theme::success("OK"), message, moved);
                }
            }
            OrganizeEvent::Error(message) => {
                bar.abandon();
                failure = Some(message);
            }
        }
    }

    session.finish();
    if output_mode != OutputMode::Quiet {
        println!(
            "{}",
            Theme::primary(&format!(
                "Files organized this session: {}",
                session.files_organized()
            ))
        );
    }

    if let Some(message) = failure {
        bail!("{}", Theme::error(&message));
    }
    Ok(())
}
