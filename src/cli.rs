use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub mod commands;
mod interactive_menu;

use crate::logging;
use crate::output::OutputMode;
use commands::{backup_command, config_command, organize_command, preview_command};

/// Read a line from stdin after flushing any pending prompt.
pub(crate) fn read_line_from_stdin() -> io::Result<String> {
    io::stdout().flush()?;

    let mut input = String::new();
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    handle.read_line(&mut input)?;

    Ok(input)
}

/// Ask a yes/no question; anything other than "y"/"yes" is a no.
pub(crate) fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N]: ", prompt);
    let input = read_line_from_stdin()?;
    let trimmed = input.trim().to_lowercase();
    Ok(trimmed == "y" || trimmed == "yes")
}

#[derive(Parser)]
#[command(name = "typefold")]
#[command(version)]
#[command(about = "Sort the files of a folder into type-named subfolders")]
#[command(
    long_about = "typefold moves the files directly inside a folder into subfolders named \
    after their extension (PDF Files, TXT Files, ...). Only extensions with at least \
    --min-files files get a folder. Pointing it at a single file moves that file into a \
    folder next to it.\n\n\
    Examples:\n  \
    typefold preview ~/Downloads               # Show what would happen\n  \
    typefold organize ~/Downloads --min-files 3\n  \
    typefold organize ~/Desktop/photo.png -y   # Single file, no prompt\n  \
    typefold backup ~/Downloads                # Zip snapshot only"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the organization plan without moving anything
    #[command(visible_alias = "p")]
    Preview {
        /// Folder or single file to organize
        path: PathBuf,

        /// Minimum files of one type before a folder is created (1-50)
        #[arg(short = 'm', long, value_name = "N")]
        min_files: Option<usize>,

        /// Output the plan as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Move files into type-named subfolders
    #[command(visible_alias = "o")]
    Organize {
        /// Folder or single file to organize
        path: PathBuf,

        /// Minimum files of one type before a folder is created (1-50)
        #[arg(short = 'm', long, value_name = "N")]
        min_files: Option<usize>,

        /// Create a zip backup first (default from config)
        #[arg(long, conflicts_with = "no_backup")]
        backup: bool,

        /// Skip the zip backup
        #[arg(long)]
        no_backup: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,

        /// Move files without the short pause between moves
        #[arg(long)]
        no_pace: bool,
    },

    /// Create a zip snapshot of a file or folder next to it
    #[command(visible_alias = "b")]
    Backup {
        /// File or folder to snapshot
        path: PathBuf,
    },

    /// View or modify configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,

        /// Set the default minimum files per folder
        #[arg(long, value_name = "N")]
        min_files: Option<usize>,

        /// Set whether a backup is created before organizing
        #[arg(long, value_name = "BOOL")]
        backup: Option<bool>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn run(self) -> anyhow::Result<()> {
        logging::init(self.verbose, self.quiet);
        let output_mode = OutputMode::from_flags(self.verbose, self.quiet);

        match self.command {
            None => {
                Self::show_interactive_menu();
                Ok(())
            }
            Some(Commands::Preview {
                path,
                min_files,
                json,
            }) => preview_command::handle_preview(path, min_files, json, output_mode),
            Some(Commands::Organize {
                path,
                min_files,
                backup,
                no_backup,
                yes,
                no_pace,
            }) => {
                let backup = match (backup, no_backup) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                organize_command::handle_organize(
                    path,
                    min_files,
                    backup,
                    yes,
                    no_pace,
                    output_mode,
                )
            }
            Some(Commands::Backup { path }) => backup_command::handle_backup(path, output_mode),
            Some(Commands::Config {
                show,
                reset,
                min_files,
                backup,
            }) => config_command::handle_config(show, reset, min_files, backup),
        }
    }
}
