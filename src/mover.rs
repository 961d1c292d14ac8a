//! Organize engine.
//!
//! Runs one strictly sequential pass over a target: a directory is scanned,
//! planned and its included groups moved into `<EXT> Files` folders; a single
//! file is moved into a sibling folder regardless of the threshold.
//!
//! Progress and status go to the observer as they happen. [`run`] adds the
//! terminal event; [`organize`] leaves it to the caller.

pub mod naming;
pub mod relocate;

use crate::cancel::CancelToken;
use crate::error::OrganizeError;
use crate::events::{self, OrganizeEvent};
use crate::planner;
use crate::scanner;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct OrganizeRequest {
    pub target: PathBuf,
    /// Minimum group size in directory mode; ignored for a single file.
    pub min_files: usize,
    /// Pause after each successful move, purely for progress display.
    pub pace: Option<Duration>,
}

impl OrganizeRequest {
    pub fn new(target: impl Into<PathBuf>, min_files: usize) -> Self {
        Self {
            target: target.into(),
            min_files,
            pace: None,
        }
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed { moved: usize },
    /// No group met the threshold. A successful run that moved nothing.
    NothingToOrganize,
    Cancelled { moved: usize },
}

impl Outcome {
    pub fn moved(&self) -> usize {
        match self {
            Outcome::Completed { moved } | Outcome::Cancelled { moved } => *moved,
            Outcome::NothingToOrganize => 0,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::Completed { moved: 1 } => "Successfully organized 1 file.".to_string(),
            Outcome::Completed { moved } => format!("Successfully organized {} files!", moved),
            Outcome::NothingToOrganize => "No files found to organize.".to_string(),
            Outcome::Cancelled { .. } => "Organization cancelled.".to_string(),
        }
    }
}

/// One planned relocation with its destination name already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOperation {
    pub source: PathBuf,
    pub folder: PathBuf,
    pub file_name: String,
}

impl MoveOperation {
    fn resolve(source: PathBuf, folder: &Path, original_name: &str) -> Self {
        let file_name = naming::resolve_file_name(folder, original_name);
        Self {
            source,
            folder: folder.to_path_buf(),
            file_name,
        }
    }

    pub fn destination(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }

    fn execute(&self) -> io::Result<()> {
        relocate::move_file(&self.source, &self.destination())
    }
}

fn ensure_folder(folder: &Path) -> Result<(), OrganizeError> {
    fs::create_dir_all(folder).map_err(|e| {
        OrganizeError::io(format!("Failed to create folder '{}'", folder.display()), e)
    })
}

/// Organize `request.target`, reporting progress and status to `observer`.
pub fn organize(
    request: &OrganizeRequest,
    cancel: &CancelToken,
    observer: &mut dyn FnMut(OrganizeEvent),
) -> Result<Outcome, OrganizeError> {
    let target = &request.target;
    if target.is_file() {
        organize_file(target, cancel, observer)
    } else if target.is_dir() {
        organize_directory(request, cancel, observer)
    } else {
        Err(OrganizeError::InvalidTarget {
            path: target.clone(),
        })
    }
}

/// [`organize`], then emit the single terminal event for the outcome.
pub fn run(
    request: &OrganizeRequest,
    cancel: &CancelToken,
    observer: &mut dyn FnMut(OrganizeEvent),
) -> Result<Outcome, OrganizeError> {
    let result = organize(request, cancel, observer);
    match &result {
        Ok(outcome) => {
            info!(path = %request.target.display(), ?outcome, "organize finished");
            observer(OrganizeEvent::Completed {
                message: outcome.message(),
                moved: outcome.moved(),
            });
        }
        Err(e) => {
            warn!(path = %request.target.display(), error = %e, "organize failed");
            observer(OrganizeEvent::Error(e.to_string()));
        }
    }
    result
}

fn organize_file(
    path: &Path,
    cancel: &CancelToken,
    observer: &mut dyn FnMut(OrganizeEvent),
) -> Result<Outcome, OrganizeError> {
    let unsupported = || OrganizeError::UnsupportedFile {
        path: path.to_path_buf(),
    };
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(unsupported)?
        .to_string();
    let extension = scanner::extension_of(&file_name).ok_or_else(unsupported)?;

    if cancel.is_cancelled() {
        return Ok(Outcome::Cancelled { moved: 0 });
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let folder_name = planner::folder_name(&extension);
    let folder = parent.join(&folder_name);
    info!(file = %path.display(), folder = %folder_name, "organizing single file");

    ensure_folder(&folder)?;
    let op = MoveOperation::resolve(path.to_path_buf(), &folder, &file_name);
    op.execute().map_err(|source| OrganizeError::MoveFailed {
        file: file_name.clone(),
        source,
    })?;
    debug!(dest = %op.destination().display(), "moved");

    observer(OrganizeEvent::Progress(100));
    observer(OrganizeEvent::Status(format!(
        "Moved {} to '{}'.",
        file_name, folder_name
    )));
    Ok(Outcome::Completed { moved: 1 })
}

fn organize_directory(
    request: &OrganizeRequest,
    cancel: &CancelToken,
    observer: &mut dyn FnMut(OrganizeEvent),
) -> Result<Outcome, OrganizeError> {
    let dir = &request.target;
    let groups = scanner::scan(dir);
    let plan = planner::plan(&groups, request.min_files);
    let total = plan.files_to_move();

    info!(
        dir = %dir.display(),
        threshold = request.min_files,
        folders = plan.folders_to_create(),
        files = total,
        "organizing directory"
    );

    if total == 0 {
        observer(OrganizeEvent::Status(
            "No files match the criteria to organize.".to_string(),
        ));
        return Ok(Outcome::NothingToOrganize);
    }

    // Percentages keep `total` as the denominator even when files vanish
    let mut processed = 0usize;
    for group in plan.included() {
        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled { moved: processed });
        }

        let folder = dir.join(&group.folder_name);
        ensure_folder(&folder)?;

        for file_name in &group.files {
            if cancel.is_cancelled() {
                return Ok(Outcome::Cancelled { moved: processed });
            }

            let source = dir.join(file_name);
            if !source.exists() {
                debug!(file = %file_name, "source vanished since scan, skipping");
                continue;
            }

            let op = MoveOperation::resolve(source, &folder, file_name);
            op.execute().map_err(|source| OrganizeError::MoveFailed {
                file: file_name.clone(),
                source,
            })?;
            processed += 1;
            debug!(file = %file_name, dest = %op.destination().display(), "moved");

            observer(OrganizeEvent::Progress(events::percent(processed, total)));
            observer(OrganizeEvent::Status(format!(
                "Moving {}... ({}/{})",
                file_name, processed, total
            )));

            if let Some(pace) = request.pace {
                thread::sleep(pace);
            }
        }
    }

    Ok(Outcome::Completed { moved: processed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name).unwrap();
    }

    fn collect(
        request: &OrganizeRequest,
        cancel: &CancelToken,
    ) -> (Result<Outcome, OrganizeError>, Vec<OrganizeEvent>) {
        let mut events = Vec::new();
        let result = run(request, cancel, &mut |e| events.push(e));
        (result, events)
    }

    #[test]
    fn test_end_to_end_threshold_two() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path();
        touch(dir, "a.txt");
        touch(dir, "b.txt");
        touch(dir, "c.jpg");

        let (result, events) = collect(&OrganizeRequest::new(dir, 2), &CancelToken::new());

        assert_eq!(result.unwrap(), Outcome::Completed { moved: 2 });
        assert!(dir.join("TXT Files/a.txt").exists());
        assert!(dir.join("TXT Files/b.txt").exists());
        assert!(dir.join("c.jpg").exists());
        assert!(!dir.join("JPG Files").exists());
        assert_eq!(
            events.last(),
            Some(&OrganizeEvent::Completed {
                message: "Successfully organized 2 files!".to_string(),
                moved: 2,
            })
        );
    }

    #[test]
    fn test_progress_is_monotonic_and_terminal_event_is_last() {
        let temp_dir = create_test_dir();
        for name in ["1.md", "2.md", "3.md", "x.rs", "y.rs"] {
            touch(temp_dir.path(), name);
        }

        let (_, events) = collect(
            &OrganizeRequest::new(temp_dir.path(), 2),
            &CancelToken::new(),
        );

        let progress: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                OrganizeEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![20, 40, 60, 80, 100]);
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert!(events.last().unwrap().is_terminal());
        assert!(events.contains(&OrganizeEvent::Status("Moving 1.md... (1/5)".to_string())));
    }

    #[test]
    fn test_nothing_to_organize_is_success() {
        let temp_dir = create_test_dir();
        touch(temp_dir.path(), "a.txt");
        touch(temp_dir.path(), "b.jpg");

        let (result, events) = collect(
            &OrganizeRequest::new(temp_dir.path(), 2),
            &CancelToken::new(),
        );

        assert_eq!(result.unwrap(), Outcome::NothingToOrganize);
        assert_eq!(
            events,
            vec![
                OrganizeEvent::Status("No files match the criteria to organize.".to_string()),
                OrganizeEvent::Completed {
                    message: "No files found to organize.".to_string(),
                    moved: 0,
                },
            ]
        );
    }

    #[test]
    fn test_existing_folder_is_reused_and_collisions_suffixed() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path();
        let folder = dir.join("TXT Files");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("a.txt"), "old").unwrap();
        fs::write(folder.join("keep.txt"), "keep").unwrap();
        touch(dir, "a.txt");
        touch(dir, "b.txt");

        let (result, _) = collect(&OrganizeRequest::new(dir, 2), &CancelToken::new());

        assert_eq!(result.unwrap(), Outcome::Completed { moved: 2 });
        assert_eq!(fs::read_to_string(folder.join("a.txt")).unwrap(), "old");
        assert_eq!(fs::read_to_string(folder.join("a_1.txt")).unwrap(), "a.txt");
        assert!(folder.join("keep.txt").exists());
        assert!(folder.join("b.txt").exists());
    }

    #[test]
    fn test_cancel_after_n_moves_leaves_rest_untouched() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path();
        for name in ["a.txt", "b.txt", "c.txt", "d.txt"] {
            touch(dir, name);
        }

        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let mut moves = 0;
        let result = run(&OrganizeRequest::new(dir, 2), &cancel, &mut |e| {
            if let OrganizeEvent::Progress(_) = e {
                moves += 1;
                if moves == 2 {
                    trigger.cancel();
                }
            }
        });

        assert_eq!(result.unwrap(), Outcome::Cancelled { moved: 2 });
        assert!(dir.join("TXT Files/a.txt").exists());
        assert!(dir.join("TXT Files/b.txt").exists());
        assert!(dir.join("c.txt").exists());
        assert!(dir.join("d.txt").exists());
    }

    #[test]
    fn test_vanished_source_is_skipped_without_counting() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path().to_path_buf();
        for name in ["a.txt", "b.txt", "c.txt"] {
            touch(&dir, name);
        }

        let mut events = Vec::new();
        let victim = dir.join("b.txt");
        let result = run(&OrganizeRequest::new(&dir, 2), &CancelToken::new(), &mut |e| {
            if e == OrganizeEvent::Progress(33) {
                fs::remove_file(&victim).unwrap();
            }
            events.push(e);
        });

        assert_eq!(result.unwrap(), Outcome::Completed { moved: 2 });
        assert!(dir.join("TXT Files/c.txt").exists());
        // Denominator stays at the planned total
        assert!(!events.contains(&OrganizeEvent::Progress(100)));
        assert!(events.contains(&OrganizeEvent::Status("Moving c.txt... (2/3)".to_string())));
    }

    #[test]
    fn test_cancel_before_start_moves_nothing() {
        let temp_dir = create_test_dir();
        touch(temp_dir.path(), "a.txt");
        touch(temp_dir.path(), "b.txt");
        let cancel = CancelToken::new();
        cancel.cancel();

        let (result, events) = collect(&OrganizeRequest::new(temp_dir.path(), 2), &cancel);

        assert_eq!(result.unwrap(), Outcome::Cancelled { moved: 0 });
        assert!(temp_dir.path().join("a.txt").exists());
        assert_eq!(
            events.last(),
            Some(&OrganizeEvent::Completed {
                message: "Organization cancelled.".to_string(),
                moved: 0,
            })
        );
    }

    #[test]
    fn test_single_file_ignores_threshold() {
        let temp_dir = create_test_dir();
        touch(temp_dir.path(), "image.png");
        let file = temp_dir.path().join("image.png");

        let (result, events) = collect(&OrganizeRequest::new(&file, 5), &CancelToken::new());

        assert_eq!(result.unwrap(), Outcome::Completed { moved: 1 });
        assert!(temp_dir.path().join("PNG Files/image.png").exists());
        assert!(events.contains(&OrganizeEvent::Status(
            "Moved image.png to 'PNG Files'.".to_string()
        )));
        assert_eq!(
            events.last(),
            Some(&OrganizeEvent::Completed {
                message: "Successfully organized 1 file.".to_string(),
                moved: 1,
            })
        );
    }

    #[test]
    fn test_single_dotfile_moves_to_its_own_folder() {
        let temp_dir = create_test_dir();
        touch(temp_dir.path(), ".env");

        let (result, events) = collect(
            &OrganizeRequest::new(temp_dir.path().join(".env"), 1),
            &CancelToken::new(),
        );

        assert_eq!(result.unwrap(), Outcome::Completed { moved: 1 });
        assert!(temp_dir.path().join("ENV Files/.env").exists());
        assert!(events.contains(&OrganizeEvent::Status(
            "Moved .env to 'ENV Files'.".to_string()
        )));
    }

    #[test]
    fn test_single_file_without_extension_is_unsupported() {
        let temp_dir = create_test_dir();
        touch(temp_dir.path(), "LICENSE");

        let (result, events) = collect(
            &OrganizeRequest::new(temp_dir.path().join("LICENSE"), 1),
            &CancelToken::new(),
        );

        assert!(matches!(result, Err(OrganizeError::UnsupportedFile { .. })));
        assert!(matches!(events.last(), Some(OrganizeEvent::Error(_))));
        assert!(temp_dir.path().join("LICENSE").exists());
    }

    #[test]
    fn test_invalid_target_reports_error() {
        let temp_dir = create_test_dir();
        let (result, events) = collect(
            &OrganizeRequest::new(temp_dir.path().join("missing"), 2),
            &CancelToken::new(),
        );

        assert!(matches!(result, Err(OrganizeError::InvalidTarget { .. })));
        assert_eq!(events, vec![OrganizeEvent::Error("Invalid path selected.".to_string())]);
    }

    #[test]
    fn test_folder_blocked_by_file_is_fatal() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path();
        fs::write(dir.join("TXT Files"), "not a folder").unwrap();
        touch(dir, "a.txt");
        touch(dir, "b.txt");

        let (result, events) = collect(&OrganizeRequest::new(dir, 2), &CancelToken::new());

        assert!(matches!(result, Err(OrganizeError::Io { .. })));
        assert!(matches!(events.last(), Some(OrganizeEvent::Error(_))));
        assert!(dir.join("a.txt").exists());
    }

    #[test]
    fn test_move_failure_mid_run_keeps_earlier_moves_and_stops() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path().to_path_buf();
        for name in ["a.txt", "b.txt", "c.txt"] {
            touch(&dir, name);
        }

        // After the first move, swap the folder for a plain file so the next rename fails
        let folder = dir.join("TXT Files");
        let displaced = dir.join("TXT Files.old");
        let mut events = Vec::new();
        let result = run(&OrganizeRequest::new(&dir, 2), &CancelToken::new(), &mut |e| {
            if e == OrganizeEvent::Progress(33) {
                fs::rename(&folder, &displaced).unwrap();
                fs::write(&folder, "blocker").unwrap();
            }
            events.push(e);
        });

        match result {
            Err(OrganizeError::MoveFailed { file, .. }) => assert_eq!(file, "b.txt"),
            other => panic!("expected a move failure, got {:?}", other),
        }
        assert!(displaced.join("a.txt").exists());
        assert!(dir.join("b.txt").exists());
        assert!(dir.join("c.txt").exists());
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        match events.last() {
            Some(OrganizeEvent::Error(message)) => {
                assert!(message.starts_with("Failed to move b.txt: "), "{}", message)
            }
            other => panic!("expected an error event, got {:?}", other),
        }
        assert!(!events.iter().any(|e| matches!(e, OrganizeEvent::Status(s) if s.contains("c.txt"))));
    }
}
