//! Non-overwriting file move.
//!
//! Uses a rename when source and destination share a filesystem, otherwise
//! copies into a freshly created file and removes the source.

use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::debug;

#[cfg(unix)]
const CROSS_DEVICE_ERROR: i32 = 18; // EXDEV
#[cfg(windows)]
const CROSS_DEVICE_ERROR: i32 = 17; // ERROR_NOT_SAME_DEVICE
#[cfg(not(any(unix, windows)))]
const CROSS_DEVICE_ERROR: i32 = -1;

fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(CROSS_DEVICE_ERROR)
}

/// Move `source` to `dest`, failing with `AlreadyExists` rather than
/// replacing an existing destination.
///
/// The existence check and the rename are two steps: another process can
/// still create `dest` in between. On platforms where rename replaces, that
/// window is the only way this function overwrites.
pub fn move_file(source: &Path, dest: &Path) -> io::Result<()> {
    if dest.symlink_metadata().is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination already exists: {}", dest.display()),
        ));
    }

    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            debug!(
                source = %source.display(),
                dest = %dest.display(),
                "rename crosses devices, copying instead"
            );
            copy_then_remove(source, dest)
        }
        Err(e) => Err(e),
    }
}

fn copy_then_remove(source: &Path, dest: &Path) -> io::Result<()> {
    let meta = fs::metadata(source)?;
    let mut reader = File::open(source)?;
    // create_new keeps the copy path non-overwriting too
    let mut writer = OpenOptions::new().write(true).create_new(true).open(dest)?;

    let copied = io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all());
    drop(writer);
    if let Err(e) = copied {
        let _ = fs::remove_file(dest);
        return Err(e);
    }

    if let Err(e) = fs::set_permissions(dest, meta.permissions()) {
        debug!(dest = %dest.display(), error = %e, "could not copy permissions");
    }
    let mtime = FileTime::from_last_modification_time(&meta);
    if let Err(e) = filetime::set_file_mtime(dest, mtime) {
        debug!(dest = %dest.display(), error = %e, "could not copy modification time");
    }

    if let Err(e) = fs::remove_file(source) {
        // Leave the tree as it was rather than with two copies
        let _ = fs::remove_file(dest);
        return Err(e);
    }
    Ok(())
}
