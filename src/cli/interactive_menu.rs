//! Interactive menu feature.
//!
//! This module owns the help screen shown when no command is given.

use super::Cli;
use crate::theme::Theme;

impl Cli {
    /// Show the command overview when no command is provided
    pub fn show_interactive_menu() {
        println!();
        println!("{}", Theme::header("typefold - sort files into type folders"));
        println!("{}", Theme::divider_bold(60));
        println!();
        println!("{}", Theme::primary("Available Commands:"));
        println!();
        for (name, alias, about) in [
            ("preview", "p", "Show the organization plan, nothing is moved"),
            ("organize", "o", "Move files into '<EXT> Files' folders"),
            ("backup", "b", "Zip a file or folder next to it"),
        ] {
            println!("  {}  {}  {}", name, Theme::muted("or"), alias);
            println!("     {} {}", Theme::muted("→"), about);
            println!();
        }
        println!("  config");
        println!("     {} View or modify configuration", Theme::muted("→"));
        println!();
        println!("{}", Theme::divider(60));
        println!();
        println!("{}", Theme::primary("Quick Examples:"));
        println!();
        println!("  typefold preview ~/Downloads");
        println!("  typefold organize ~/Downloads --min-files 3");
        println!("  typefold organize ~/Desktop/photo.png -y");
        println!("  typefold config --min-files 4 --backup false");
        println!();
        println!(
            "{}",
            Theme::muted("Tip: Use --help with any command for detailed options")
        );
        println!();
    }
}
