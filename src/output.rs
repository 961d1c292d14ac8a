use crate::planner::{OrganizationPlan, PlannedGroup, Preview};
use crate::theme::Theme;
use serde::Serialize;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,       // Only errors
    Normal,      // Standard output
    Verbose,     // More details
    VeryVerbose, // All details including file paths
}

impl OutputMode {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            OutputMode::Quiet
        } else if verbose >= 2 {
            OutputMode::VeryVerbose
        } else if verbose == 1 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

/// Aggregate counts shown under a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewTotals {
    pub total_files: usize,
    pub file_types: usize,
    pub folders_to_create: usize,
}

impl PreviewTotals {
    pub fn of(preview: &Preview) -> Self {
        match preview {
            Preview::SingleFile { .. } => Self {
                total_files: 1,
                file_types: 1,
                folders_to_create: 1,
            },
            Preview::Directory { plan, .. } => Self {
                total_files: plan.total_files(),
                file_types: plan.type_count(),
                folders_to_create: plan.folders_to_create(),
            },
        }
    }
}

#[derive(Serialize)]
struct JsonPreview<'a> {
    version: &'static str,
    timestamp: String,
    #[serde(flatten)]
    preview: &'a Preview,
    totals: PreviewTotals,
}

/// Render a preview as a folder tree.
///
/// Groups and files are sorted for display only; execution follows the plan
/// order.
pub fn render_preview(preview: &Preview) -> String {
    match preview {
        Preview::SingleFile {
            file_name,
            folder_name,
        } => {
            let mut text = String::from("Organization Plan:\n");
            text.push_str(&Theme::divider(20));
            text.push('\n');
            text.push_str(&format!(
                "-> Move '{}' to new folder: '{}'\n",
                file_name, folder_name
            ));
            text
        }
        Preview::Directory { name, plan } => render_tree(name, plan),
    }
}

fn render_tree(name: &str, plan: &OrganizationPlan) -> String {
    let mut text = format!("{}\n", Theme::folder(name));

    if plan.folders_to_create() == 0 {
        text.push_str("└── (No folders will be created based on current settings.)\n");
        return text;
    }

    let mut groups: Vec<&PlannedGroup> = plan.groups.iter().collect();
    groups.sort_by(|a, b| a.extension.cmp(&b.extension));

    for (i, group) in groups.iter().enumerate() {
        let last_group = i == groups.len() - 1;
        let branch = if last_group { "└── " } else { "├── " };

        if !group.included {
            text.push_str(&format!(
                "{}{}\n",
                branch,
                Theme::muted(&format!(
                    "Skipping '{}' ({} file(s), less than min {})",
                    group.folder_name,
                    group.files.len(),
                    plan.threshold
                ))
            ));
            continue;
        }

        text.push_str(&format!("{}{}\n", branch, Theme::folder(&group.folder_name)));
        let indent = if last_group { "    " } else { "│   " };
        let mut files: Vec<&String> = group.files.iter().collect();
        files.sort();
        for (j, file) in files.iter().enumerate() {
            let leaf = if j == files.len() - 1 { "└── " } else { "├── " };
            text.push_str(&format!("{}{}{}\n", indent, leaf, file));
        }
    }

    text
}

pub fn render_totals(totals: &PreviewTotals) -> String {
    format!(
        "Total files: {}\nFile types: {}\nFolders to create: {}\n",
        totals.total_files, totals.file_types, totals.folders_to_create
    )
}

pub fn print_preview(preview: &Preview, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    println!("{}", Theme::header("Preview"));
    println!("{}", Theme::divider_bold(60));
    print!("{}", render_preview(preview));
    println!("{}", Theme::divider(60));
    print!("{}", render_totals(&PreviewTotals::of(preview)));
    println!();
}

pub fn print_json(preview: &Preview) -> anyhow::Result<()> {
    let output = JsonPreview {
        version: "1.0",
        timestamp: chrono::Utc::now().to_rfc3339(),
        preview,
        totals: PreviewTotals::of(preview),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
